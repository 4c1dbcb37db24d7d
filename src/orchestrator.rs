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

//! Top-level composition of the EMS, splitter and mnemonic codec: turning a
//! master secret into groups of mnemonics and back.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::ems::EncryptedMasterSecret;
use crate::error::{Error, ErrorKind};
use crate::share::Share;
use crate::splitter::{self, RawShare};
use crate::util;

/// One group's worth of freshly generated shares.
#[derive(Debug, Clone)]
pub struct GroupShare {
	/// x-coordinate of this group (0-based).
	pub group_index: u8,
	/// Number of groups needed to reconstruct the master secret.
	pub group_threshold: u8,
	/// Total number of groups.
	pub group_count: u8,
	/// Number of member shares needed to reconstruct this group's share.
	pub member_threshold: u8,
	/// One mnemonic (as a word list) per member share in this group.
	pub mnemonics: Vec<Vec<String>>,
}

/// Split an already-encrypted master secret into group shares wrapped as
/// mnemonics.
pub fn split_ems(
	group_threshold: u8,
	groups: &[(u8, u8)],
	ems: &EncryptedMasterSecret,
	config: &Config,
) -> Result<Vec<GroupShare>, Error> {
	if ems.ciphertext.len() * 8 < config.min_strength_bits as usize {
		return Err(ErrorKind::Argument(format!(
			"Encrypted master secret must be at least {} bits",
			config.min_strength_bits
		)))?;
	}
	if group_threshold == 0 || group_threshold as usize > groups.len() {
		return Err(ErrorKind::Argument(
			"Group threshold must be between 1 and the number of groups".to_string(),
		))?;
	}
	if groups.len() > config.max_share_count as usize {
		return Err(ErrorKind::Argument(format!(
			"Cannot split into more than {} groups",
			config.max_share_count
		)))?;
	}
	for &(member_threshold, member_count) in groups {
		if member_threshold == 1 && member_count > 1 {
			return Err(ErrorKind::Argument(
				"Groups with a member threshold of 1 must have exactly one member".to_string(),
			))?;
		}
	}

	let group_count = groups.len() as u8;
	let group_raw_shares = splitter::split(group_threshold, group_count, &ems.ciphertext, config)?;

	let mut result = vec![];
	for (i, &(member_threshold, member_count)) in groups.iter().enumerate() {
		let group_share = group_raw_shares
			.iter()
			.find(|s| s.x == i as u8)
			.expect("split() always returns one share per requested x");
		let member_raw_shares = splitter::split(member_threshold, member_count, &group_share.data, config)?;

		let mut mnemonics = vec![];
		for raw in &member_raw_shares {
			let share = Share {
				identifier: ems.identifier,
				extendable: ems.extendable,
				iteration_exponent: ems.iteration_exponent,
				group_index: i as u8,
				group_threshold,
				group_count,
				member_index: raw.x,
				member_threshold,
				value: raw.data.clone(),
			};
			mnemonics.push(share.to_mnemonic(config)?);
		}

		result.push(GroupShare {
			group_index: i as u8,
			group_threshold,
			group_count,
			member_threshold,
			mnemonics,
		});
	}

	Ok(result)
}

/// Reconstruct an EMS from a complete map of group shares (exactly
/// `group_threshold` groups, each with exactly its `member_threshold` shares).
pub fn recover_ems(groups: &BTreeMap<u8, Vec<Share>>, config: &Config) -> Result<EncryptedMasterSecret, Error> {
	if groups.is_empty() {
		return Err(ErrorKind::Mnemonic("No shares were provided.".to_string()))?;
	}

	let first_share = groups.values().next().and_then(|g| g.first()).ok_or_else(|| {
		ErrorKind::Mnemonic("At least one group has no shares.".to_string())
	})?;
	let identifier = first_share.identifier;
	let extendable = first_share.extendable;
	let iteration_exponent = first_share.iteration_exponent;
	let group_threshold = first_share.group_threshold;

	if groups.len() != group_threshold as usize {
		return Err(ErrorKind::Mnemonic(format!(
			"Wrong number of groups. Expected {}, got {}.",
			group_threshold,
			groups.len()
		)))?;
	}

	let mut group_raw_shares = vec![];
	for (&group_index, shares) in groups.iter() {
		let member_threshold = shares
			.first()
			.ok_or_else(|| ErrorKind::Mnemonic("A group has no shares.".to_string()))?
			.member_threshold;
		if shares.len() != member_threshold as usize {
			return Err(ErrorKind::Mnemonic(format!(
				"Group {} has the wrong number of shares. Expected {}, got {}.",
				group_index,
				member_threshold,
				shares.len()
			)))?;
		}
		let member_raw_shares: Vec<RawShare> = shares
			.iter()
			.map(|s| RawShare {
				x: s.member_index,
				data: s.value.clone(),
			})
			.collect();
		let group_secret = splitter::recover(member_threshold, &member_raw_shares, config)?;
		group_raw_shares.push(RawShare {
			x: group_index,
			data: group_secret,
		});
	}

	let ciphertext = splitter::recover(group_threshold, &group_raw_shares, config)?;
	Ok(EncryptedMasterSecret {
		identifier,
		extendable,
		iteration_exponent,
		ciphertext,
	})
}

/// Generate mnemonics for a freshly encrypted master secret.
pub fn generate_mnemonics(
	group_threshold: u8,
	groups: &[(u8, u8)],
	master_secret: &[u8],
	passphrase: &[u8],
	iteration_exponent: u8,
	extendable: bool,
	config: &Config,
) -> Result<Vec<GroupShare>, Error> {
	if master_secret.len() * 8 < config.min_strength_bits as usize {
		return Err(ErrorKind::Argument(format!(
			"Master secret must be at least {} bits",
			config.min_strength_bits
		)))?;
	}
	let normalized_passphrase = util::normalize_passphrase_bytes(passphrase)?;
	util::require_printable_ascii(&normalized_passphrase)?;

	let identifier = Share::generate_identifier(config);
	let ems = EncryptedMasterSecret::from_master_secret(
		master_secret,
		&normalized_passphrase,
		identifier,
		extendable,
		iteration_exponent,
		config,
	)?;
	split_ems(group_threshold, groups, &ems, config)
}

/// Parse a batch of mnemonics and bucket them by group index, validating
/// that every mnemonic shares the same identifier, extendable flag,
/// iteration exponent, group threshold and group count.
pub fn decode_mnemonics(mnemonics: &[Vec<String>], config: &Config) -> Result<BTreeMap<u8, Vec<Share>>, Error> {
	let mut groups: BTreeMap<u8, Vec<Share>> = BTreeMap::new();
	let mut common: Option<(u16, bool, u8, u8, u8)> = None;

	for words in mnemonics {
		let share = Share::from_mnemonic(words, config)?;
		let params = (
			share.identifier,
			share.extendable,
			share.iteration_exponent,
			share.group_threshold,
			share.group_count,
		);
		match common {
			Some(c) if c != params => {
				return Err(ErrorKind::Mnemonic(
					"All mnemonics must have the same identifier, extendable flag, iteration exponent, \
					 group threshold and group count."
						.to_string(),
				))?;
			}
			_ => common = Some(params),
		}
		let bucket = groups.entry(share.group_index).or_insert_with(Vec::new);
		if !bucket.iter().any(|s: &Share| s.member_index == share.member_index && s.value == share.value) {
			bucket.push(share);
		}
	}

	Ok(groups)
}

/// Parse, bucket, recover and decrypt a batch of mnemonics in one step.
pub fn combine_mnemonics(mnemonics: &[Vec<String>], passphrase: &[u8], config: &Config) -> Result<Vec<u8>, Error> {
	let groups = decode_mnemonics(mnemonics, config)?;
	let ems = recover_ems(&groups, config)?;
	let normalized_passphrase = util::normalize_passphrase_bytes(passphrase)?;
	ems.decrypt(&normalized_passphrase, config)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_group_round_trip() {
		let config = Config::new();
		let secret = [0xAB; 16];
		let groups = generate_mnemonics(1, &[(3, 5)], &secret, b"TREZOR", 0, false, &config).unwrap();
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].mnemonics.len(), 5);

		let chosen: Vec<Vec<String>> = groups[0].mnemonics.iter().take(3).cloned().collect();
		let recovered = combine_mnemonics(&chosen, b"TREZOR", &config).unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn multi_group_round_trip() {
		let config = Config::new();
		let secret = [0xCD; 16];
		let groups = generate_mnemonics(2, &[(2, 3), (3, 5), (1, 1)], &secret, b"", 0, true, &config).unwrap();
		assert_eq!(groups.len(), 3);

		let mut chosen: Vec<Vec<String>> = groups[0].mnemonics.iter().take(2).cloned().collect();
		chosen.extend(groups[2].mnemonics.iter().take(1).cloned());
		let recovered = combine_mnemonics(&chosen, b"", &config).unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn not_enough_groups_fails() {
		let config = Config::new();
		let secret = [0x11; 16];
		let groups = generate_mnemonics(2, &[(2, 3), (3, 5)], &secret, b"", 0, false, &config).unwrap();
		let chosen: Vec<Vec<String>> = groups[0].mnemonics.iter().take(2).cloned().collect();
		assert!(combine_mnemonics(&chosen, b"", &config).is_err());
	}

	#[test]
	fn rejects_multi_member_single_threshold_group() {
		let config = Config::new();
		let secret = [0x22; 16];
		assert!(generate_mnemonics(1, &[(1, 2)], &secret, b"", 0, false, &config).is_err());
	}

	#[test]
	fn wrong_passphrase_fails_to_recover_original_secret() {
		let config = Config::new();
		let secret = [0x33; 16];
		let groups = generate_mnemonics(1, &[(3, 5)], &secret, b"correct horse", 0, false, &config).unwrap();
		let chosen: Vec<Vec<String>> = groups[0].mnemonics.iter().take(3).cloned().collect();
		let recovered = combine_mnemonics(&chosen, b"wrong horse", &config).unwrap();
		assert_ne!(recovered, secret);
	}
}
