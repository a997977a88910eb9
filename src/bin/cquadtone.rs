use clap::Parser;
use image::io::Reader;
use quadtone::compression;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(about = "Compresses an image file to a quadtone file", long_about = None)]
#[command(version)]
struct Args {
    /// The input image file.
    #[arg(short, long)]
    input: PathBuf,

    /// The output quadtone file.
    #[arg(short, long)]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();

    let reader = match Reader::open(args.input) {
        Ok(r) => r,
        Err(e) => {
            println!("Cannot open file: {}", e);
            process::exit(1)
        }
    };

    let dynamic_image = match reader.decode() {
        Ok(d) => d,
        Err(e) => {
            println!("Cannot decode image: {}", e);
            process::exit(1)
        }
    };

    let image = dynamic_image.to_rgb8();
    let (width, height) = image.dimensions();

    let compressed = compression::encode(&image);

    let file = match File::create(&args.output) {
        Ok(f) => f,
        Err(e) => {
            println!("Cannot create output file: {}", e);
            process::exit(1)
        }
    };

    if let Err(e) = compressed.write_to(BufWriter::new(file)) {
        println!("Cannot write output file: {}", e);
        process::exit(1)
    }

    let raw_size = (width as u64) * (height as u64) * 3;
    println!(
        "Compressed {}x{} ({} bytes raw) into {} bytes",
        width,
        height,
        raw_size,
        compressed.byte_count()
    );
    if let Ok(meta) = fs::metadata(&args.output) {
        println!("On disk: {} bytes", meta.len());
    }
}
