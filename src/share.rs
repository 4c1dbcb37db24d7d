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

//! Definition of a share and its conversion to and from a mnemonic.

use crate::bitpacker::BitPacker;
use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::rs1024;
use crate::util;
use crate::wordlist::{WORDLIST, WORD_INDEX_MAP};

use zeroize::Zeroize;

/// A point on the secret-sharing polynomial, annotated with the metadata
/// that locates it in the two-level scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
	/// Random 15-bit value shared by every share derived from the same EMS.
	pub identifier: u16,
	/// Whether `identifier` participates in the Feistel KDF salt.
	pub extendable: bool,
	/// PBKDF2 iteration exponent; actual iterations = 2500*2^e per round.
	pub iteration_exponent: u8,
	/// x-coordinate of the group share (0-15).
	pub group_index: u8,
	/// Number of group shares needed to reconstruct the master secret.
	pub group_threshold: u8,
	/// Total number of groups.
	pub group_count: u8,
	/// x-coordinate of the member share within its group (0-15).
	pub member_index: u8,
	/// Number of member shares needed to reconstruct the group share.
	pub member_threshold: u8,
	/// The share value bytes (even length, >= 16).
	pub value: Vec<u8>,
}

impl Drop for Share {
	fn drop(&mut self) {
		self.value.zeroize();
	}
}

impl Share {
	/// Generate a fresh random identifier restricted to `id_length_bits`.
	pub fn generate_identifier(config: &Config) -> u16 {
		let bytes = util::fill_vec_rand(2);
		let raw = u16::from_be_bytes([bytes[0], bytes[1]]);
		raw & ((1u16 << config.id_length_bits) - 1)
	}

	/// Convert this share to its mnemonic word sequence.
	pub fn to_mnemonic(&self, config: &Config) -> Result<Vec<String>, Error> {
		let bp = self.pack_bits(config)?;
		let mut words = Vec::with_capacity(bp.len() / config.radix_bits as usize);
		for i in (0..bp.len()).step_by(config.radix_bits as usize) {
			let idx = bp.get_u32(i, config.radix_bits as usize)?;
			words.push(WORDLIST[idx as usize].clone());
		}
		Ok(words)
	}

	/// Parse a share from an already-tokenized, already-lowercased mnemonic.
	pub fn from_mnemonic(words: &[String], config: &Config) -> Result<Self, Error> {
		if words.len() < config.min_mnemonic_length_words as usize {
			return Err(ErrorKind::Mnemonic(format!(
				"Invalid mnemonic length. The length of each mnemonic must be at least {} words.",
				config.min_mnemonic_length_words,
			)))?;
		}
		let mut bp = BitPacker::new();
		for w in words {
			let idx = WORD_INDEX_MAP.get(w).ok_or_else(|| {
				ErrorKind::Mnemonic(format!("Invalid mnemonic. '{}' is not a recognized word.", w))
			})?;
			bp.append_u32(*idx as u32, config.radix_bits)?;
		}
		Self::parse_bits(&bp, config)
	}

	/// Parse a share from a raw mnemonic string, normalizing it first.
	pub fn from_mnemonic_str(s: &str, config: &Config) -> Result<Self, Error> {
		let words = util::normalize_mnemonic_str(s);
		Self::from_mnemonic(&words, config)
	}

	fn pack_bits(&self, config: &Config) -> Result<BitPacker, Error> {
		let value_bits = self.value.len() * 8;
		let mut padding_bit_count = config.radix_bits - (value_bits % config.radix_bits as usize) as u8;
		if padding_bit_count == config.radix_bits {
			padding_bit_count = 0;
		}

		let mut bp = BitPacker::new();
		bp.append_u16(self.identifier, config.id_length_bits)?;
		bp.append_u8(self.extendable as u8, config.extendable_flag_length_bits)?;
		bp.append_u8(self.iteration_exponent, config.iteration_exp_length_bits)?;
		bp.append_u8(self.group_index, 4)?;
		bp.append_u8(self.group_threshold - 1, 4)?;
		bp.append_u8(self.group_count - 1, 4)?;
		bp.append_u8(self.member_index, 4)?;
		bp.append_u8(self.member_threshold - 1, 4)?;
		bp.append_padding(padding_bit_count);
		bp.append_vec_u8(&self.value)?;

		if bp.len() % config.radix_bits as usize != 0 {
			return Err(ErrorKind::Mnemonic(format!(
				"Incorrect share bit length. Must be a multiple of {}, actual length: {}",
				config.radix_bits,
				bp.len(),
			)))?;
		}

		let mut sum_data: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(config.radix_bits as usize) {
			sum_data.push(bp.get_u32(i, config.radix_bits as usize)?);
		}

		let checksum = rs1024::create_checksum(
			config.customization_string(self.extendable),
			&sum_data,
			config.checksum_length_words,
		);
		for c in checksum {
			bp.append_u32(c, config.radix_bits)?;
		}

		Ok(bp)
	}

	fn parse_bits(bp: &BitPacker, config: &Config) -> Result<Self, Error> {
		if bp.len() % config.radix_bits as usize != 0 {
			return Err(ErrorKind::Mnemonic("Invalid mnemonic length.".to_string()))?;
		}

		let identifier = bp.get_u16(0, config.id_length_bits as usize)?;
		let extendable = bp.get_u8(
			config.id_length_bits as usize,
			config.extendable_flag_length_bits as usize,
		)? != 0;
		let iteration_exponent = bp.get_u8(
			(config.id_length_bits + config.extendable_flag_length_bits) as usize,
			config.iteration_exp_length_bits as usize,
		)?;
		let group_index = bp.get_u8(20, 4)?;
		let group_threshold = bp.get_u8(24, 4)? + 1;
		let group_count = bp.get_u8(28, 4)? + 1;
		let member_index = bp.get_u8(32, 4)?;
		let member_threshold = bp.get_u8(36, 4)? + 1;

		if group_count < group_threshold {
			return Err(ErrorKind::Mnemonic(
				"Invalid mnemonic. Group threshold cannot be greater than group count.".to_string(),
			))?;
		}

		let mut sum_data: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(config.radix_bits as usize) {
			sum_data.push(bp.get_u32(i, config.radix_bits as usize)?);
		}

		rs1024::verify_checksum(config.customization_string(extendable), &sum_data).map_err(|_| {
			let prefix: Vec<u32> = sum_data.iter().take(4).copied().collect();
			ErrorKind::Mnemonic(format!(
				"Invalid mnemonic checksum (words starting with {:?}).",
				prefix
			))
		})?;

		let checksum_bits = config.radix_bits as usize * config.checksum_length_words as usize;
		let value_bit_len = bp.len() - 40 - checksum_bits;
		let padding = value_bit_len % 16;
		if padding > 8 {
			return Err(ErrorKind::Mnemonic("Invalid mnemonic length.".to_string()))?;
		}

		let mut vbp = bp.clone();
		vbp.split_out(40, bp.len() - checksum_bits);
		vbp.remove_padding(padding)?;
		let value = vbp.get_vec_u8(0, vbp.len() / 8)?;

		Ok(Share {
			identifier,
			extendable,
			iteration_exponent,
			group_index,
			group_threshold,
			group_count,
			member_index,
			member_threshold,
			value,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_share() -> Share {
		Share {
			identifier: 21219,
			extendable: false,
			iteration_exponent: 0,
			group_index: 0,
			group_threshold: 1,
			group_count: 1,
			member_index: 4,
			member_threshold: 3,
			value: b"\x84\x06\xce\xa0p\xbfe~\rA\x01\t5\xaf\xd3Z".to_vec(),
		}
	}

	#[test]
	fn mnemonic_round_trips() {
		let config = Config::new();
		let share = sample_share();
		let mnemonic = share.to_mnemonic(&config).unwrap();
		assert_eq!(mnemonic.len(), config.min_mnemonic_length_words as usize);
		let decoded = Share::from_mnemonic(&mnemonic, &config).unwrap();
		assert_eq!(share, decoded);
	}

	#[test]
	fn mnemonic_from_str_normalizes_case_and_whitespace() {
		let config = Config::new();
		let share = sample_share();
		let mnemonic = share.to_mnemonic(&config).unwrap().join(" ").to_uppercase();
		let padded = format!("  {}  ", mnemonic);
		let decoded = Share::from_mnemonic_str(&padded, &config).unwrap();
		assert_eq!(share, decoded);
	}

	#[test]
	fn tampering_one_word_breaks_checksum() {
		let config = Config::new();
		let share = sample_share();
		let mut mnemonic = share.to_mnemonic(&config).unwrap();
		let last = mnemonic.len() - 1;
		let current_idx = WORD_INDEX_MAP[&mnemonic[last]];
		let other_idx = (current_idx + 1) % WORDLIST.len();
		mnemonic[last] = WORDLIST[other_idx].clone();
		assert!(Share::from_mnemonic(&mnemonic, &config).is_err());
	}

	#[test]
	fn extendable_flag_round_trips() {
		let config = Config::new();
		let mut share = sample_share();
		share.extendable = true;
		let mnemonic = share.to_mnemonic(&config).unwrap();
		let decoded = Share::from_mnemonic(&mnemonic, &config).unwrap();
		assert!(decoded.extendable);
		assert_eq!(share, decoded);
	}

	#[test]
	fn too_short_mnemonic_is_rejected() {
		let config = Config::new();
		let words = vec!["abandon".to_string(); 5];
		assert!(Share::from_mnemonic(&words, &config).is_err());
	}
}
