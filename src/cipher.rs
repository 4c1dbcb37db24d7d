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

//! The four-round unbalanced Feistel cipher used to encrypt the master
//! secret under a passphrase before splitting.

use crate::config::Config;
use crate::error::{Error, ErrorKind};

#[cfg(feature = "ring_pbkdf2")]
use ring::{digest, pbkdf2};
#[cfg(feature = "ring_pbkdf2")]
use std::num::NonZeroU32;

#[cfg(feature = "rust_crypto_pbkdf2")]
use hmac::Hmac;
#[cfg(feature = "rust_crypto_pbkdf2")]
use pbkdf2::pbkdf2;
#[cfg(feature = "rust_crypto_pbkdf2")]
use sha2::Sha256;

use zeroize::Zeroize;

/// Encrypt `master_secret` under `passphrase`, as the four-round Feistel
/// network described in spec section 4.4.
pub fn encrypt(
	master_secret: &[u8],
	passphrase: &[u8],
	iteration_exponent: u8,
	identifier: u16,
	extendable: bool,
	config: &Config,
) -> Result<Vec<u8>, Error> {
	feistel(
		master_secret,
		passphrase,
		iteration_exponent,
		identifier,
		extendable,
		config,
		false,
	)
}

/// Inverse of [`encrypt`].
pub fn decrypt(
	enc_master_secret: &[u8],
	passphrase: &[u8],
	iteration_exponent: u8,
	identifier: u16,
	extendable: bool,
	config: &Config,
) -> Result<Vec<u8>, Error> {
	feistel(
		enc_master_secret,
		passphrase,
		iteration_exponent,
		identifier,
		extendable,
		config,
		true,
	)
}

fn feistel(
	input: &[u8],
	passphrase: &[u8],
	e: u8,
	identifier: u16,
	extendable: bool,
	config: &Config,
	reverse: bool,
) -> Result<Vec<u8>, Error> {
	if input.is_empty() || input.len() % 2 != 0 {
		return Err(ErrorKind::Value(
			"Master secret must have even, nonzero length".to_string(),
		))?;
	}

	let mut l = input[..input.len() / 2].to_vec();
	let mut r = input[input.len() / 2..].to_vec();
	let mut salt = get_salt(identifier, extendable, config);

	let rounds: Vec<u8> = if reverse {
		(0..config.round_count).rev().collect()
	} else {
		(0..config.round_count).collect()
	};

	for i in rounds {
		let f = round_function(i, passphrase, e, &salt, &r, config)?;
		let new_r = xor(&l, &f);
		l = r;
		r = new_r;
	}

	let mut out = r;
	out.append(&mut l);
	salt.zeroize();
	Ok(out)
}

fn get_salt(identifier: u16, extendable: bool, config: &Config) -> Vec<u8> {
	if extendable {
		vec![]
	} else {
		let mut retval = config.customization_string(false).to_vec();
		retval.extend_from_slice(&identifier.to_be_bytes());
		retval
	}
}

/// the round function used internally by the Feistel cipher
fn round_function(
	i: u8,
	passphrase: &[u8],
	e: u8,
	salt: &[u8],
	r: &[u8],
	config: &Config,
) -> Result<Vec<u8>, Error> {
	let iterations = (u32::from(config.base_iteration_count) << e) / u32::from(config.round_count);
	let out_length = r.len();

	let mut kdf_salt = salt.to_vec();
	kdf_salt.extend_from_slice(r);

	let mut password = vec![i];
	password.extend_from_slice(passphrase);

	let result = pbkdf2_derive(iterations, &kdf_salt, &password, out_length);
	kdf_salt.zeroize();
	password.zeroize();
	result
}

#[cfg(feature = "rust_crypto_pbkdf2")]
fn pbkdf2_derive(
	iterations: u32,
	salt: &[u8],
	password: &[u8],
	out_length: usize,
) -> Result<Vec<u8>, Error> {
	let mut out = vec![0; out_length];
	pbkdf2::<Hmac<Sha256>>(password, salt, iterations as usize, &mut out)
		.map_err(|e| ErrorKind::GenericError(format!("PBKDF2 error: {}", e)))?;
	Ok(out)
}

#[cfg(feature = "ring_pbkdf2")]
fn pbkdf2_derive(
	iterations: u32,
	salt: &[u8],
	password: &[u8],
	out_length: usize,
) -> Result<Vec<u8>, Error> {
	let mut out = vec![0; out_length];
	pbkdf2::derive(
		&digest::SHA256,
		NonZeroU32::new(iterations).ok_or_else(|| ErrorKind::Value("iterations must be nonzero".to_string()))?,
		salt,
		password,
		&mut out,
	);
	Ok(out)
}

// xor values in both arrays, up to length of b
fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
	let mut retval = vec![0; b.len()];
	for i in 0..b.len() {
		retval[i] = a[i] ^ b[i];
	}
	retval
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{thread_rng, Rng};

	fn enc_dec_test_impl(secret: Vec<u8>, passphrase: &[u8], identifier: u16, extendable: bool) {
		let config = Config::new();
		let encrypted = encrypt(&secret, passphrase, 0, identifier, extendable, &config).unwrap();
		let decrypted = decrypt(&encrypted, passphrase, 0, identifier, extendable, &config).unwrap();
		assert_eq!(secret, decrypted);
	}

	#[test]
	fn master_enc_dec_round_trips() {
		let s = b"\x0c\x94\x90\xbcn\xd6\xbc\xbf\xac>\xbe}\xeeV\xf2P".to_vec();
		enc_dec_test_impl(s.clone(), b"", 7470, false);
		enc_dec_test_impl(s, b"", 7470, true);

		for _ in 0..10 {
			let s: [u8; 16] = thread_rng().gen();
			let id: u16 = thread_rng().gen();
			enc_dec_test_impl(s.to_vec(), b"", id, false);
			enc_dec_test_impl(s.to_vec(), b"pebkac", id, true);
		}
	}

	#[test]
	fn extendable_ignores_identifier() {
		let config = Config::new();
		let secret = [7u8; 16];
		let enc_a = encrypt(&secret, b"pw", 0, 111, true, &config).unwrap();
		let enc_b = encrypt(&secret, b"pw", 0, 222, true, &config).unwrap();
		// different identifiers, same extendable salt => same ciphertext
		assert_eq!(enc_a, enc_b);
	}

	#[test]
	fn non_extendable_binds_identifier() {
		let config = Config::new();
		let secret = [7u8; 16];
		let enc_a = encrypt(&secret, b"pw", 0, 111, false, &config).unwrap();
		let enc_b = encrypt(&secret, b"pw", 0, 222, false, &config).unwrap();
		assert_ne!(enc_a, enc_b);
	}

	#[test]
	fn wrong_passphrase_yields_different_but_same_length_secret() {
		let config = Config::new();
		let secret = [9u8; 16];
		let encrypted = encrypt(&secret, b"correct", 0, 42, false, &config).unwrap();
		let decrypted = decrypt(&encrypted, b"wrong", 0, 42, false, &config).unwrap();
		assert_eq!(decrypted.len(), secret.len());
		assert_ne!(decrypted, secret);
	}
}
