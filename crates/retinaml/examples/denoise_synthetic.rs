//! Synthetic Denoising Comparison Example
//!
//! Builds deterministic synthetic image splits, corrupts them with Gaussian
//! noise, and compares all four denoising autoencoders on the test split.

use retinaml::evaluate::{compare_models, print_comparison};
use retinaml::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== RetinaML - Denoising Autoencoder Comparison ===\n");

    println!("Version: {}", retinaml::version());
    println!("Features: {}\n", retinaml::features());

    // 1. Build clean and corrupted splits
    println!("1. Generating synthetic images (48 train / 8 val / 8 test at 32x32)...");
    let clean = SyntheticImages::new(48, 8, 8)
        .with_resolution(32, 32)
        .load_splits()?;
    let noisy = noisy_splits(&clean, 0.2);
    let (height, width, colors) = clean.image_shape();
    println!("   Test batch: {:?}\n", clean.test.shape());

    // 2. Construct the four architectures
    println!("2. Constructing models at {height}x{width}x{colors}...");
    let mut shallow = ShallowAutoencoder::new(ShallowConfig {
        height,
        width,
        colors,
        latent_dim: 64,
    })?;
    let mut conv = ConvAutoencoder::new(ConvAutoencoderConfig {
        height,
        width,
        colors,
        filters: vec![16, 8],
        ..ConvAutoencoderConfig::default()
    })?;
    let mut segnet = SegNet::new(SegNetConfig {
        height,
        width,
        colors,
        stages: vec![SegNetStage::new(8, 2), SegNetStage::new(16, 2)],
        ..SegNetConfig::default()
    })?;
    let mut unet = UNet::new(UNetConfig {
        height,
        width,
        colors,
        root_filters: 8,
        depth: 2,
        ..UNetConfig::default()
    })?;

    shallow.eval();
    conv.eval();
    segnet.eval();
    unet.eval();

    let models: Vec<(&str, &dyn Module)> = vec![
        ("shallow_autoencoder", &shallow),
        ("conv_autoencoder", &conv),
        ("segnet", &segnet),
        ("unet", &unet),
    ];

    for (name, model) in &models {
        println!("   {name}: {} parameters", model.num_parameters());
    }

    // 3. Denoise the test split with every model
    println!("\n3. Denoising the test split...");
    let reports = compare_models(&models, &noisy.test, &clean.test)?;

    for report in &reports {
        println!("\n{report}");
    }

    // 4. Side-by-side comparison
    print_comparison(&reports);

    println!("\n=== Comparison Complete! ===");
    Ok(())
}
