//! Program-image construction and run helpers.

use rv32_core::{Config, Cpu};

/// Cycle budget for harness runs; generous for small test programs.
pub const TEST_CYCLE_BUDGET: u64 = 1_000;

/// Serialises 32-bit instruction words into a little-endian byte image.
pub fn image_from_words(words: &[u32]) -> Vec<u8> {
    let mut image = Vec::with_capacity(words.len() * 4);
    for word in words {
        image.extend_from_slice(&word.to_le_bytes());
    }
    image
}

/// Serialises 16-bit parcels into a little-endian byte image.
pub fn image_from_halves(halves: &[u16]) -> Vec<u8> {
    let mut image = Vec::with_capacity(halves.len() * 2);
    for half in halves {
        image.extend_from_slice(&half.to_le_bytes());
    }
    image
}

/// Builds a CPU with the given configuration and program image.
pub fn cpu_with_image(config: &Config, image: Vec<u8>) -> Cpu {
    let mut cpu = Cpu::new(config);
    cpu.load_program(image);
    cpu
}

/// Runs a 32-bit word program to completion on a default machine.
pub fn run_words(words: &[u32]) -> Cpu {
    run_words_with(&Config::default(), words)
}

/// Runs a 32-bit word program to completion on a configured machine.
pub fn run_words_with(config: &Config, words: &[u32]) -> Cpu {
    let mut cpu = cpu_with_image(config, image_from_words(words));
    cpu.run(TEST_CYCLE_BUDGET);
    cpu
}

/// Runs a program of 16-bit parcels to completion on a default machine.
pub fn run_halves(halves: &[u16]) -> Cpu {
    let mut cpu = cpu_with_image(&Config::default(), image_from_halves(halves));
    cpu.run(TEST_CYCLE_BUDGET);
    cpu
}
