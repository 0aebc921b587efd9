//! Glyph alphabet for the falling columns.

/// Glyphs a drop may show: katakana, decimal digits and hex letters.
pub const GLYPHS: &[char] = &[
    'ア', 'カ', 'サ', 'タ', 'ナ', 'ハ', 'マ', 'ヤ', 'ラ', 'ワ', 'ガ', 'ザ', 'ダ', 'バ', 'パ', 'イ',
    'キ', 'シ', 'チ', 'ニ', 'ヒ', 'ミ', 'リ', 'ウ', 'ィ', 'ク', 'ス', 'ツ', 'ヌ', 'フ', 'ム', 'ユ',
    'ル', 'グ', 'ズ', 'ヅ', 'ブ', 'プ', 'エ', 'ケ', 'セ', 'テ', 'ネ', 'ヘ', 'メ', 'レ', 'ヱ', 'ゲ',
    'ゼ', 'デ', 'ベ', 'ペ', 'オ', 'コ', 'ソ', 'ト', 'ノ', 'ホ', 'モ', 'ヨ', 'ロ', 'ヲ', 'ゴ', 'ゾ',
    'ド', 'ボ', 'ポ', 'ヴ', 'ッ', 'ン', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A',
    'B', 'C', 'D', 'E', 'F',
];

/// Whether `ch` belongs to [`GLYPHS`].
pub fn is_glyph(ch: char) -> bool {
    GLYPHS.contains(&ch)
}
