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

//! The 4-byte integrity digest that authenticates a reconstructed secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// digest = HMAC-SHA256(key=random_part, msg=shared_secret)[:4]
pub fn create_digest(random_part: &[u8], shared_secret: &[u8]) -> [u8; 4] {
	let mut mac = HmacSha256::new_from_slice(random_part).expect("HMAC accepts any key length");
	mac.update(shared_secret);
	let result = mac.finalize().into_bytes();
	let mut out = [0u8; 4];
	out.copy_from_slice(&result[0..4]);
	out
}

/// Constant-time verification that `digest` matches
/// `create_digest(random_part, shared_secret)`.
pub fn verify_digest(digest: &[u8], random_part: &[u8], shared_secret: &[u8]) -> bool {
	let expected = create_digest(random_part, shared_secret);
	crate::util::constant_time_eq(digest, &expected)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn digest_round_trip() {
		let random_part = b"0123456789012345";
		let secret = b"abcdefghijklmnop";
		let d = create_digest(random_part, secret);
		assert!(verify_digest(&d, random_part, secret));
	}

	#[test]
	fn digest_detects_tamper() {
		let random_part = b"0123456789012345";
		let secret = b"abcdefghijklmnop";
		let mut d = create_digest(random_part, secret);
		d[0] ^= 1;
		assert!(!verify_digest(&d, random_part, secret));
	}
}
