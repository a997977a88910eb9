use clap::Parser;
use quadtone::compression::{self, CompressedImage};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(about = "Decompresses a quadtone file to another image file", long_about = None)]
#[command(version)]
struct Args {
    /// The input quadtone file.
    #[arg(short, long)]
    input: PathBuf,

    /// The output file. The output format will be determined using
    /// the extension of the output file.
    #[arg(short, long)]
    output: PathBuf,

    /// Original image height in pixels. The quadtone stream does not store
    /// the height; when this is omitted it is reconstructed from the stream
    /// length, which is only exact for heights that are multiples of 4.
    #[arg(long)]
    height: Option<u32>,
}

fn main() {
    let args = Args::parse();

    let input_file = match File::open(args.input) {
        Err(e) => {
            println!("Cannot open input file: {}", e);
            process::exit(1);
        }
        Ok(f) => f,
    };

    let compressed = match CompressedImage::read_from(BufReader::new(input_file)) {
        Err(error) => {
            println!("Error while decompressing the image: {:?}", error);
            process::exit(1)
        }
        Ok(c) => c,
    };

    let height = args.height.unwrap_or_else(|| compressed.legacy_height());
    let image = compression::decode(&compressed, height);

    if let Err(e) = image.save(args.output) {
        println!("Cannot save image: {}", e);
        process::exit(1)
    }
}
