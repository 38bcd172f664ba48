//! Emoji alphabet for synthesized slugs.
//!
//! Every entry is a single code point with default emoji presentation, so a
//! synthesized slug never depends on variation selectors or joiners to render.

use rand::Rng;

/// Number of symbols in a synthesized slug.
pub const SLUG_LENGTH: usize = 5;

/// Curated symbols drawn from when synthesizing a slug.
pub const EMOJI_ALPHABET: &[char] = &[
    '🐶', '🐱', '🐭', '🐹', '🐰', '🦊', '🐻', '🐼', '🐨', '🐯', '🦁', '🐮',
    '🐷', '🐸', '🐵', '🐔', '🐧', '🐦', '🐤', '🦆', '🦅', '🦉', '🦇', '🐺',
    '🐗', '🐴', '🦄', '🐝', '🐛', '🦋', '🐌', '🐞', '🐜', '🦂', '🐢', '🐍',
    '🦎', '🦖', '🦕', '🐙', '🦑', '🦐', '🦞', '🦀', '🐡', '🐠', '🐟', '🐬',
    '🐳', '🐋', '🦈', '🐊', '🐅', '🐆', '🦓', '🦍', '🐘', '🦛', '🦏', '🐪',
    '🐫', '🦒', '🦘', '🐃', '🐂', '🐄', '🐎', '🐖', '🐏', '🐑', '🦙', '🐐',
    '🦌', '🐕', '🐩', '🐈', '🐓', '🦃', '🦚', '🦜', '🦢', '🐇', '🦝', '🦡',
    '🦔', '🍏', '🍎', '🍐', '🍊', '🍋', '🍌', '🍉', '🍇', '🍓', '🍈', '🍒',
    '🍑', '🥭', '🍍', '🥥', '🥝', '🍅', '🍆', '🥑', '🥦', '🥬', '🥒', '🌽',
    '🥕', '🥔', '🍠', '🥐', '🥯', '🍞', '🥖', '🥨', '🧀', '🥚', '🍳', '🥞',
    '🥓', '🥩', '🍗', '🍖', '🌭', '🍔', '🍟', '🍕', '🥪', '🥙', '🌮', '🌯',
    '🥗', '🥘', '🍝', '🍜', '🍲', '🍛', '🍣', '🍱', '🥟', '🍤', '🍙', '🍚',
    '🍘', '🍥', '🥠', '🥮', '🍢', '🍡', '🍧', '🍨', '🍦', '🥧', '🧁', '🍰',
    '🎂', '🍮', '🍭', '🍬', '🍫', '🍿', '🍩', '🍪', '🌰', '🥜', '🍯', '🎉',
    '🎈', '🎁', '🎀', '🎊', '🎃', '🎄', '🎆', '🎇', '🧨', '✨', '🚀', '🌈',
    '🌵', '🌲', '🌴', '🍀', '🍁', '🍄', '🌻', '🌹', '🌷', '🌸', '🌼', '🌙',
    '🌟', '⭐', '🔥', '🌊', '⚡', '💎', '🔔', '🎸', '🎺', '🎻', '🥁', '🎲',
    '🎯', '🎳', '🏀', '🏈', '⚽', '⚾', '🎾', '🏐', '🏉', '🎱',
];

/// Draws [`SLUG_LENGTH`] symbols uniformly at random from [`EMOJI_ALPHABET`].
pub fn random_slug<R: Rng>(rng: &mut R) -> String {
    (0..SLUG_LENGTH)
        .map(|_| EMOJI_ALPHABET[rng.random_range(0..EMOJI_ALPHABET.len())])
        .collect()
}

/// Total number of distinct synthesized slugs (`|alphabet| ^ length`).
pub fn key_space() -> u128 {
    (EMOJI_ALPHABET.len() as u128).pow(SLUG_LENGTH as u32)
}
