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

//! The Shamir secret splitter: turns a (threshold, count, secret) triple
//! into byte-indexed shares and reverses the transformation.

use crate::config::Config;
use crate::digest;
use crate::error::{Error, ErrorKind};
use crate::field;
use crate::util;

use zeroize::Zeroize;

/// A single point on the secret-sharing polynomial: x-coordinate plus the
/// (possibly multi-byte) value at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawShare {
	/// x-coordinate, 0-255
	pub x: u8,
	/// value bytes
	pub data: Vec<u8>,
}

impl Drop for RawShare {
	fn drop(&mut self) {
		self.data.zeroize();
	}
}

/// Split `secret` into `count` raw shares such that any `threshold` of them
/// reconstruct it.
pub fn split(threshold: u8, count: u8, secret: &[u8], config: &Config) -> Result<Vec<RawShare>, Error> {
	if threshold == 0 || threshold > config.max_share_count {
		return Err(ErrorKind::Argument(format!(
			"Threshold must be between 1 and {}",
			config.max_share_count
		)))?;
	}
	if count < threshold || count > config.max_share_count {
		return Err(ErrorKind::Argument(format!(
			"Share count with given threshold must be between {} and {}",
			threshold, config.max_share_count
		)))?;
	}
	if secret.len() < 16 || secret.len() % 2 != 0 {
		return Err(ErrorKind::Argument(
			"Secret must be at least 16 bytes in length and a multiple of 2".to_string(),
		))?;
	}

	if threshold == 1 {
		return Ok((0..count)
			.map(|x| RawShare {
				x,
				data: secret.to_vec(),
			})
			.collect());
	}

	let random_share_count = threshold - 2;

	let mut shares: Vec<RawShare> = (0..random_share_count)
		.map(|x| RawShare {
			x,
			data: util::fill_vec_rand(secret.len()),
		})
		.collect();

	let mut random_part = util::fill_vec_rand(secret.len() - config.digest_length_bytes as usize);
	let digest = digest::create_digest(&random_part, secret);
	let mut digest_row = digest.to_vec();
	digest_row.append(&mut random_part);

	let mut base_points: Vec<(u8, Vec<u8>)> =
		shares.iter().map(|s| (s.x, s.data.clone())).collect();
	base_points.push((config.digest_index, digest_row));
	base_points.push((config.secret_index, secret.to_vec()));

	for x in random_share_count..count {
		let data = field::interpolate(&base_points, x)?;
		shares.push(RawShare { x, data });
	}

	for p in &mut base_points {
		p.1.zeroize();
	}

	Ok(shares)
}

/// Recover the original secret from `shares` (at least `threshold` of them).
pub fn recover(threshold: u8, shares: &[RawShare], config: &Config) -> Result<Vec<u8>, Error> {
	if shares.is_empty() {
		return Err(ErrorKind::Value("Share set must not be empty.".to_string()))?;
	}

	if threshold == 1 {
		return Ok(shares[0].data.clone());
	}

	let points: Vec<(u8, Vec<u8>)> = shares.iter().map(|s| (s.x, s.data.clone())).collect();

	let secret = field::interpolate(&points, config.secret_index)?;

	let mut digest_row = field::interpolate(&points, config.digest_index)?;
	let random_part = digest_row.split_off(config.digest_length_bytes as usize);
	let ok = digest::verify_digest(&digest_row, &random_part, &secret);
	digest_row.zeroize();

	if !ok {
		let mut secret = secret;
		secret.zeroize();
		return Err(ErrorKind::Digest(
			"Invalid digest of the shared secret".to_string(),
		))?;
	}

	Ok(secret)
}
