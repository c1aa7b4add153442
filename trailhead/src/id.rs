use nanoid::nanoid;

/// Alphabet for guide and comment identifiers. Alphanumeric with the
/// easily-confused glyphs (0/O, 1/I/l) removed; ids land in URLs and logs.
const ID_ALPHABET: &[char] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q',
    'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q',
    'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const ID_LENGTH: usize = 20;

/// Generates a fresh store-unique identifier.
pub fn new_entity_id() -> String {
    nanoid!(ID_LENGTH, ID_ALPHABET)
}
