//! FFT engine using realfft for real-valued sequences

use num_complex::Complex64;
use realfft::{FftError, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Forward real FFT with reusable buffers
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Spectrum X[k] for k = 0..=fft_size/2
    ///
    /// # Arguments
    /// * `signal` - Input sequence, zero-padded (or truncated) to fft_size
    pub fn compute_spectrum(&mut self, signal: &[f64]) -> Result<Vec<Complex64>, FftError> {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)?;

        Ok(self.output_buffer.clone())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (fft_size/2 + 1)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}
