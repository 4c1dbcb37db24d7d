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

//! The Encrypted Master Secret: the record that is actually Shamir-split.

use crate::cipher;
use crate::config::Config;
use crate::error::Error;
use crate::util;

use zeroize::Zeroize;

/// EMS: {identifier, extendable flag, iteration exponent, ciphertext}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMasterSecret {
	/// Random 15-bit identifier shared by every mnemonic derived from this EMS.
	pub identifier: u16,
	/// Whether the identifier participates in the Feistel KDF salt.
	pub extendable: bool,
	/// PBKDF2 iteration exponent; actual iterations = 2500*2^e per round.
	pub iteration_exponent: u8,
	/// Feistel-encrypted master secret bytes.
	pub ciphertext: Vec<u8>,
}

impl Drop for EncryptedMasterSecret {
	fn drop(&mut self) {
		self.ciphertext.zeroize();
	}
}

impl EncryptedMasterSecret {
	/// Encrypt a master secret into an EMS under the given passphrase.
	pub fn from_master_secret(
		master_secret: &[u8],
		passphrase: &[u8],
		identifier: u16,
		extendable: bool,
		iteration_exponent: u8,
		config: &Config,
	) -> Result<Self, Error> {
		let ciphertext = cipher::encrypt(
			master_secret,
			passphrase,
			iteration_exponent,
			identifier,
			extendable,
			config,
		)?;
		Ok(EncryptedMasterSecret {
			identifier,
			extendable,
			iteration_exponent,
			ciphertext,
		})
	}

	/// Decrypt, recovering the original master secret bytes.
	pub fn decrypt(&self, passphrase: &[u8], config: &Config) -> Result<Vec<u8>, Error> {
		let normalized = util::normalize_passphrase_bytes(passphrase)?;
		cipher::decrypt(
			&self.ciphertext,
			&normalized,
			self.iteration_exponent,
			self.identifier,
			self.extendable,
			config,
		)
	}
}
