pub mod cpu_gaussian_blurrer;
mod gaussian;
