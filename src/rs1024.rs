// Copyright 2019 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! RS1024 checksum: a 30-bit BCH-like code over GF(1024), domain-separated
//! by a customization string prefix.

use crate::error::{Error, ErrorKind};

const GEN: [u32; 10] = [
	0xe0e040, 0x1c1c080, 0x3838100, 0x7070200, 0xe0e0009, 0x1c0c2412, 0x38086c24, 0x3090fc48,
	0x21b1f890, 0x3f3f120,
];

/// values interpreted as a list of 10 bit integers
fn polymod(values: &[u32]) -> u32 {
	let mut chk = 1;
	for &v in values {
		let b = chk >> 20;
		chk = ((chk & 0xfffff) << 10) ^ v;
		for (i, gen) in GEN.iter().enumerate() {
			if (b >> i) & 1 == 1 {
				chk ^= gen;
			}
		}
	}
	chk
}

/// Append three zero words to (customization ++ data), fold with `polymod`,
/// XOR with 1, and emit three checksum words, most-significant first.
pub fn create_checksum(custom_string: &[u8], data: &[u32], checksum_length_words: u8) -> Vec<u32> {
	let mut values: Vec<u32> = custom_string.iter().map(|d| *d as u32).collect();
	values.extend(data.iter().copied());
	values.extend(std::iter::repeat(0).take(checksum_length_words as usize));

	let polymod = polymod(&values) ^ 1;
	let mut retval = vec![];
	for i in 0..checksum_length_words as usize {
		retval.push(polymod >> (10 * (checksum_length_words as usize - 1 - i)) & 1023);
	}
	retval
}

/// Verify that `data` (including its trailing checksum words) folds to 1.
pub fn verify_checksum(custom_string: &[u8], data: &[u32]) -> Result<(), Error> {
	let mut values: Vec<u32> = custom_string.iter().map(|d| *d as u32).collect();
	values.extend(data.iter().copied());
	if polymod(&values) != 1 {
		return Err(ErrorKind::Checksum(format!(
			"Error verifying checksum: {:?}",
			data,
		)))?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::error::Error;

	#[test]
	fn checksum() -> Result<(), Error> {
		let mut test_vec = vec![
			663, 96, 0, 66, 132, 27, 234, 28, 191, 405, 992, 848, 257, 36, 858, 1012, 858,
		];
		let expected = vec![1001, 340, 369];
		let checksum = create_checksum(b"shamir", &test_vec, 3);
		assert_eq!(checksum, expected);
		test_vec.extend_from_slice(&checksum);
		verify_checksum(b"shamir", &test_vec)?;
		assert!(verify_checksum(b"fhamir", &test_vec).is_err());
		test_vec[0] = 23;
		assert!(verify_checksum(b"shamir", &test_vec).is_err());

		let mut test_vec = vec![
			663, 96, 0, 66, 177, 310, 288, 156, 827, 77, 232, 34, 965, 772, 962, 966, 754,
		];
		let expected = vec![247, 29, 757];
		let checksum = create_checksum(b"shamir", &test_vec, 3);
		assert_eq!(checksum, expected);
		test_vec.extend_from_slice(&checksum);
		verify_checksum(b"shamir", &test_vec)?;
		assert!(verify_checksum(b"fhamir", &test_vec).is_err());
		test_vec[1] = 99;
		assert!(verify_checksum(b"shamir", &test_vec).is_err());

		Ok(())
	}

	#[test]
	fn flipping_a_word_breaks_the_checksum() {
		let data = vec![1, 2, 3, 4, 5];
		let mut words = data.clone();
		words.extend(create_checksum(b"shamir", &data, 3));
		assert!(verify_checksum(b"shamir", &words).is_ok());
		words[2] ^= 1;
		assert!(verify_checksum(b"shamir", &words).is_err());
	}
}
