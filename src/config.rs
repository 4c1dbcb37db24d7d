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

//! Configuration for the secret sharing engine. All wire-observable
//! constants live here; everything else derives its values from a single
//! `Config::default()` rather than redeclaring them.

/// Config Struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// The length of the radix in bits
	pub radix_bits: u8,
	/// The length of the random Identifier in bits
	pub id_length_bits: u8,
	/// The length of the extendable-backup flag, in bits
	pub extendable_flag_length_bits: u8,
	/// The length of the iteration exponent in bits
	pub iteration_exp_length_bits: u8,
	/// The maximum number of shares that can be created
	pub max_share_count: u8,
	/// The length of the RS1024 checksum in words
	pub checksum_length_words: u8,
	/// The length of the digest of the shared secret in bytes
	pub digest_length_bytes: u8,
	/// The customization string used for non-extendable shares
	pub customization_string: Vec<u8>,
	/// The customization string used for extendable shares
	pub customization_string_extendable: Vec<u8>,
	/// The minimum allowed entropy of the master secret
	pub min_strength_bits: u16,
	/// The base number of iterations to use in PBKDF2 (before the
	/// iteration-exponent shift)
	pub base_iteration_count: u32,
	/// The number of rounds to use in the Feistel cipher
	pub round_count: u8,
	/// The index of the share containing the shared secret
	pub secret_index: u8,
	/// The index of the share containing the digest of the shared secret
	pub digest_index: u8,
	/// The number of words in the word list
	pub radix: u16,
	/// The length of the random identifier and iteration exponent in words
	pub id_exp_length_words: u8,
	/// The length of a mnemonic in words, excluding the share value
	pub metadata_length_words: u8,
	/// The minimum allowed length of a mnemonic, in words
	pub min_mnemonic_length_words: u8,
	/// The number of leading words shared by every mnemonic in a group,
	/// used as a UI hint (ID/exponent words plus the group index word).
	pub group_prefix_length_words: u8,
}

impl Default for Config {
	fn default() -> Self {
		let radix_bits = 10;
		let id_length_bits = 15;
		let extendable_flag_length_bits = 1;
		let iteration_exp_length_bits = 4;
		let max_share_count = 16;
		let checksum_length_words = 3;
		let digest_length_bytes = 4;
		let customization_string = b"shamir".to_vec();
		let customization_string_extendable = b"shamir_extendable".to_vec();
		let min_strength_bits = 128;
		let base_iteration_count = 10000;
		let round_count = 4;
		let secret_index = 255;
		let digest_index = 254;

		// derived values
		let radix = 2u16.pow(radix_bits as u32);
		let id_exp_length_words = ((id_length_bits + extendable_flag_length_bits + iteration_exp_length_bits)
			as f64
			/ radix_bits as f64)
			.ceil() as u8;
		let metadata_length_words = id_exp_length_words + 2 + checksum_length_words;
		let min_mnemonic_length_words =
			metadata_length_words + (min_strength_bits as f64 / 10f64).ceil() as u8;
		let group_prefix_length_words = id_exp_length_words + 1;

		Config {
			radix_bits,
			id_length_bits,
			extendable_flag_length_bits,
			iteration_exp_length_bits,
			max_share_count,
			checksum_length_words,
			digest_length_bytes,
			customization_string,
			customization_string_extendable,
			min_strength_bits,
			base_iteration_count,
			round_count,
			secret_index,
			digest_index,
			radix,
			id_exp_length_words,
			metadata_length_words,
			min_mnemonic_length_words,
			group_prefix_length_words,
		}
	}
}

impl Config {
	/// Just use defaults for now
	pub fn new() -> Self {
		Config {
			..Default::default()
		}
	}

	/// The customization string to use for the given extendable-backup flag.
	pub fn customization_string(&self, extendable: bool) -> &[u8] {
		if extendable {
			&self.customization_string_extendable
		} else {
			&self.customization_string
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn derived_constants_match_spec() {
		let c = Config::new();
		assert_eq!(c.radix, 1024);
		assert_eq!(c.id_exp_length_words, 2);
		assert_eq!(c.metadata_length_words, 7);
		assert_eq!(c.min_mnemonic_length_words, 20);
		assert_eq!(c.group_prefix_length_words, 3);
	}
}
