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

//! Small cross-cutting utilities: the injectable random-bytes source,
//! constant-time comparison and passphrase normalization.

use crate::error::{Error, ErrorKind};
use rand::{thread_rng, Rng};
use std::sync::RwLock;

lazy_static! {
	static ref RANDOM_BYTES: RwLock<fn(usize) -> Vec<u8>> = RwLock::new(default_random_bytes);
}

fn default_random_bytes(n: usize) -> Vec<u8> {
	let mut v = vec![0u8; n];
	thread_rng().fill(&mut v[..]);
	v
}

/// fill a u8 vec with n bytes of random data, via the current injected source
pub fn fill_vec_rand(n: usize) -> Vec<u8> {
	let f = *RANDOM_BYTES.read().expect("random bytes lock poisoned");
	f(n)
}

/// Replace the default cryptographically secure random-bytes source with a
/// caller-supplied one (e.g. a deterministic generator for tests). Per the
/// single-threaded contract of this crate, only swap this during process
/// setup.
pub fn set_random_bytes(f: fn(usize) -> Vec<u8>) {
	*RANDOM_BYTES.write().expect("random bytes lock poisoned") = f;
}

/// Constant-time byte-sequence equality. A length mismatch still scans the
/// shorter length before returning false, so timing doesn't immediately leak
/// which input was shorter.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	let len = a.len().min(b.len());
	let mut diff: u8 = (a.len() != b.len()) as u8;
	for i in 0..len {
		diff |= a[i] ^ b[i];
	}
	diff == 0
}

/// Normalize a passphrase supplied as bytes: it must round-trip through
/// UTF-8 decode/encode unchanged.
pub fn normalize_passphrase_bytes(input: &[u8]) -> Result<Vec<u8>, Error> {
	match std::str::from_utf8(input) {
		Ok(s) if s.as_bytes() == input => Ok(input.to_vec()),
		_ => Err(ErrorKind::Value(
			"Passphrase bytes must be valid UTF-8".to_string(),
		))?,
	}
}

/// `generateMnemonics` additionally requires every byte to be printable
/// ASCII (code points 32-126 inclusive).
pub fn require_printable_ascii(passphrase: &[u8]) -> Result<(), Error> {
	if passphrase.iter().all(|&b| (32..=126).contains(&b)) {
		Ok(())
	} else {
		Err(ErrorKind::Value(
			"Passphrase must consist of printable ASCII characters".to_string(),
		))?
	}
}

/// Normalize a mnemonic word list prior to lookup: lowercase, collapse
/// interior whitespace runs to a single space, trim leading/trailing
/// whitespace. See DESIGN.md for the rationale (spec ambiguity resolved).
pub fn normalize_mnemonic_str(s: &str) -> Vec<String> {
	s.trim()
		.split_whitespace()
		.map(|w| w.to_lowercase())
		.collect()
}
