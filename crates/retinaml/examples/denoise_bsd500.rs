//! BSD500 Denoising Example
//!
//! Loads the Berkeley Segmentation Dataset from disk, corrupts the test
//! split with Gaussian noise, and denoises it with a convolutional
//! autoencoder.
//!
//! Expects the dataset at `./BSD` (override with the `BSD500_ROOT`
//! environment variable):
//!
//! ```text
//! BSD/
//!   train/*.jpg
//!   val/*.jpg
//!   test/*.jpg
//! ```

use retinaml::evaluate::evaluate_model;
use retinaml::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== RetinaML - BSD500 Denoising Example ===\n");

    let root = std::env::var("BSD500_ROOT").unwrap_or_else(|_| "BSD".to_string());
    println!("1. Loading BSD500 from '{root}' at 64x64...");

    let dataset = Bsd500::with_config(Bsd500Config {
        root: root.clone().into(),
        width: 64,
        height: 64,
        ..Bsd500Config::default()
    });

    let clean = match dataset.load_splits() {
        Ok(splits) => splits,
        Err(err) => {
            eprintln!("Could not load the dataset: {err}");
            eprintln!("Expected '{root}/train', '{root}/val', and '{root}/test' with .jpg images.");
            std::process::exit(1);
        }
    };

    let (train, val, test) = clean.counts();
    println!("   Loaded {train} train / {val} val / {test} test images");
    println!("   Test batch: {:?}\n", clean.test.shape());

    // 2. Corrupt the splits
    println!("2. Adding Gaussian noise (factor 0.2)...");
    let noisy = noisy_splits(&clean, 0.2);

    // 3. Denoise the test split
    let (height, width, colors) = clean.image_shape();
    println!("3. Constructing conv autoencoder at {height}x{width}x{colors}...");
    let mut model = ConvAutoencoder::new(ConvAutoencoderConfig {
        height,
        width,
        colors,
        filters: vec![32, 16, 8],
        ..ConvAutoencoderConfig::default()
    })?;
    model.eval();
    println!("   {} parameters\n", model.num_parameters());

    let report = evaluate_model("conv_autoencoder", &model, &noisy.test, &clean.test)?;
    println!("{report}");

    println!("\n=== Denoising Complete! ===");
    Ok(())
}
