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

//! GF(2^8) arithmetic and Lagrange interpolation over that field.

pub mod gf256;

use crate::error::{Error, ErrorKind};
use gf256::TABLES;

/// Evaluate, at `x`, the unique degree-(k-1) polynomial over GF(2^8) (applied
/// independently byte-wise) passing through `points`. `points` must have
/// distinct x-coordinates and data of equal length.
///
/// Uses the log-sum technique: for point i, the log of its Lagrange basis
/// coefficient at `x` is
///   L_i = (sum_m log(x_m ^ x) - log(x_i ^ x) - sum_{m != i} log(x_i ^ x_m)) mod 255
/// and the contribution of byte y_ij is exp[(log(y_ij) + L_i) mod 255].
pub fn interpolate(points: &[(u8, Vec<u8>)], x: u8) -> Result<Vec<u8>, Error> {
	if points.is_empty() {
		return Err(ErrorKind::Value("Interpolation requires at least one point".to_string()))?;
	}

	let mut xs: Vec<u8> = points.iter().map(|p| p.0).collect();
	xs.sort_unstable();
	for w in xs.windows(2) {
		if w[0] == w[1] {
			return Err(ErrorKind::Mnemonic("Share indices must be unique".to_string()))?;
		}
	}

	let len = points[0].1.len();
	for p in points {
		if p.1.len() != len {
			return Err(ErrorKind::Mnemonic(
				"Invalid set of shares. All share values must have the same length".to_string(),
			))?;
		}
	}

	if let Some(p) = points.iter().find(|p| p.0 == x) {
		return Ok(p.1.clone());
	}

	let log = |b: u8| -> i32 { i32::from(TABLES.log[b as usize]) };
	let exp = |e: i32| -> u8 { TABLES.exp[e.rem_euclid(255) as usize] };

	let sum_log_x_minus_x: i32 = points.iter().map(|p| log(p.0 ^ x)).sum();

	let mut result = vec![0u8; len];
	for (i, (xi, yi)) in points.iter().enumerate() {
		let mut sum_others = 0i32;
		for (m, (xm, _)) in points.iter().enumerate() {
			if m != i {
				sum_others += log(xi ^ xm);
			}
		}
		let l_i = sum_log_x_minus_x - log(xi ^ x) - sum_others;

		for (j, &y) in yi.iter().enumerate() {
			if y == 0 {
				continue;
			}
			result[j] ^= exp(log(y) + l_i);
		}
	}

	Ok(result)
}
