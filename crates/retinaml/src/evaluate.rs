//! Denoising Evaluation Utilities
//!
//! Provides utilities for running denoising models over a corrupted batch
//! and comparing reconstruction quality across architectures.
//!
//! # Example
//! ```rust,ignore
//! use retinaml::evaluate::{compare_models, print_comparison};
//!
//! let reports = compare_models(
//!     &[("shallow", &shallow), ("unet", &unet)],
//!     &noisy.test,
//!     &clean.test,
//! )?;
//! print_comparison(&reports);
//! ```
//!
//! @version 0.1.0

use std::fmt;
use std::time::Duration;

#[cfg(all(feature = "core", feature = "nn"))]
use std::time::Instant;

#[cfg(all(feature = "core", feature = "nn"))]
use retinaml_core::error::{Error, Result};

#[cfg(all(feature = "core", feature = "nn"))]
use retinaml_nn::{functional, Module};

#[cfg(all(feature = "core", feature = "nn"))]
use retinaml_tensor::Tensor;

// =============================================================================
// DenoisingReport
// =============================================================================

/// Reconstruction quality and timing for one model over one test batch.
#[derive(Debug, Clone)]
pub struct DenoisingReport {
    /// Model name
    pub model_name: String,
    /// Mean squared error against the clean batch
    pub mse: f32,
    /// Peak signal-to-noise ratio in dB
    pub psnr_db: f32,
    /// Wall-clock time of the forward pass
    pub duration: Duration,
    /// Number of parameter elements
    pub param_count: usize,
    /// Parameter memory in bytes
    pub param_bytes: u64,
    /// Number of images in the batch
    pub images: usize,
}

impl DenoisingReport {
    /// Images denoised per second.
    #[must_use] pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.images as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for DenoisingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Denoising: {}", self.model_name)?;
        writeln!(f, "  MSE: {:.6}", self.mse)?;
        writeln!(f, "  PSNR: {:.2} dB", self.psnr_db)?;
        writeln!(f, "  Duration: {}", format_duration(self.duration))?;
        writeln!(
            f,
            "  Parameters: {} ({:.2} MB)",
            self.param_count,
            self.param_bytes as f64 / 1_000_000.0
        )?;
        write!(f, "  Throughput: {:.1} images/sec", self.throughput())
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Mean squared error between two equal-shaped tensors.
#[cfg(all(feature = "core", feature = "nn"))]
pub fn mse(output: &Tensor<f32>, target: &Tensor<f32>) -> Result<f32> {
    functional::mse_loss(output, target)?.item()
}

/// Peak signal-to-noise ratio in dB for unit-range images.
///
/// Uses a maximum pixel value of 1.0, so a perfect reconstruction is
/// reported as infinite.
#[cfg(all(feature = "core", feature = "nn"))]
pub fn psnr(output: &Tensor<f32>, target: &Tensor<f32>) -> Result<f32> {
    Ok(psnr_from_mse(mse(output, target)?))
}

#[cfg(all(feature = "core", feature = "nn"))]
fn psnr_from_mse(mse: f32) -> f32 {
    if mse <= 0.0 {
        f32::INFINITY
    } else {
        10.0 * (1.0 / mse).log10()
    }
}

/// Formats a duration as whole minutes and fractional seconds.
#[must_use] pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    let minutes = (secs / 60.0).floor() as u64;
    let seconds = secs - (minutes as f64) * 60.0;
    format!("{minutes} minutes and {seconds:.2} seconds")
}

// =============================================================================
// Evaluation Functions
// =============================================================================

/// Evaluates one model over a corrupted batch.
///
/// Runs a single timed forward pass over `noisy` and scores the
/// reconstruction against `clean`.
#[cfg(all(feature = "core", feature = "nn"))]
pub fn evaluate_model<M: Module + ?Sized>(
    name: &str,
    model: &M,
    noisy: &Tensor<f32>,
    clean: &Tensor<f32>,
) -> Result<DenoisingReport> {
    if noisy.shape() != clean.shape() {
        return Err(Error::shape_mismatch(clean.shape(), noisy.shape()));
    }

    let start = Instant::now();
    let restored = model.forward(noisy)?;
    let duration = start.elapsed();

    let mse = self::mse(&restored, clean)?;
    let param_count = model.num_parameters();

    Ok(DenoisingReport {
        model_name: name.to_string(),
        mse,
        psnr_db: psnr_from_mse(mse),
        duration,
        param_count,
        param_bytes: (param_count * 4) as u64,
        images: noisy.shape().first().copied().unwrap_or(0),
    })
}

/// Evaluates several models on the same corrupted batch.
///
/// Reports come back in input order; each model sees the identical noisy
/// and clean tensors.
#[cfg(all(feature = "core", feature = "nn"))]
pub fn compare_models(
    models: &[(&str, &dyn Module)],
    noisy: &Tensor<f32>,
    clean: &Tensor<f32>,
) -> Result<Vec<DenoisingReport>> {
    let mut reports = Vec::with_capacity(models.len());
    for (name, model) in models {
        reports.push(evaluate_model(name, *model, noisy, clean)?);
    }
    Ok(reports)
}

/// Prints denoising reports in a table format.
pub fn print_comparison(reports: &[DenoisingReport]) {
    if reports.is_empty() {
        println!("No denoising reports to compare.");
        return;
    }

    println!(
        "\n{:<22} {:>12} {:>12} {:>14} {:>12} {:>14}",
        "Model", "MSE", "PSNR (dB)", "Params", "Size (MB)", "Duration (s)"
    );
    println!("{}", "-".repeat(90));

    for report in reports {
        println!(
            "{:<22} {:>12.6} {:>12.2} {:>14} {:>12.2} {:>14.2}",
            report.model_name,
            report.mse,
            report.psnr_db,
            report.param_count,
            report.param_bytes as f64 / 1_000_000.0,
            report.duration.as_secs_f64(),
        );
    }

    // Best reconstruction (highest PSNR)
    if let Some(best) = reports.iter().max_by(|a, b| {
        a.psnr_db
            .partial_cmp(&b.psnr_db)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        println!(
            "\nBest reconstruction: {} ({:.2} dB)",
            best.model_name, best.psnr_db
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
