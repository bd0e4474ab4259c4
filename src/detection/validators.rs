//! Checksum and format validators for structured ID numbers
//!
//! Pure functions with no shared state. Each takes a candidate string and
//! returns a boolean; malformed input returns `false`, never an error.

/// Dihedral multiplication table for the national-ID checksum.
///
/// Multiplication in D5 is non-associative over digit order, which is what
/// makes the checksum sensitive to single-digit and transposition errors.
const MUL: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Position-dependent permutation table, cycling with period 8
const PERM: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 5, 8, 2],
];

/// Validate a 12-digit national identity number (Verhoeff checksum).
///
/// Spaces are stripped before validation. Any other non-digit character,
/// or a length other than 12 digits, fails.
pub fn validate_national_id(input: &str) -> bool {
    let digits: Vec<u8> = match input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()
    {
        Some(d) => d,
        None => return false,
    };

    if digits.len() != 12 {
        return false;
    }

    let mut check: u8 = 0;
    for (i, &digit) in digits.iter().rev().enumerate() {
        check = MUL[check as usize][PERM[i % 8][digit as usize] as usize];
    }
    check == 0
}

/// Validate a payment card number (Luhn checksum).
///
/// Spaces and hyphens are stripped. Accepts 12-19 digits, the range issuers
/// actually use; anything shorter or longer fails outright.
pub fn validate_card_number(input: &str) -> bool {
    let digits: Vec<u32> = match input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    {
        Some(d) => d,
        None => return false,
    };

    if digits.len() < 12 || digits.len() > 19 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Validate the fixed-format alphanumeric tax ID.
///
/// Structural check only: exactly ten characters, five uppercase letters,
/// four digits, one uppercase letter. The pattern is the whole contract;
/// there is no digit checksum.
pub fn validate_tax_id(input: &str) -> bool {
    let trimmed = input.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() != 10 {
        return false;
    }
    chars[..5].iter().all(|c| c.is_ascii_uppercase())
        && chars[5..9].iter().all(|c| c.is_ascii_digit())
        && chars[9].is_ascii_uppercase()
}
