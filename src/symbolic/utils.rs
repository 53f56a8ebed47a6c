// the collection of utility functions mainly for bracket parsing and proceeding

/// removes every whitespace character, the parser works on the normalized string only
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// true if every ')' closes an earlier '(' and nothing is left open
pub fn brackets_are_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

// code finds the byte position of the bracket closing the one that opens at `bracket_start`
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    if !input[bracket_start..].starts_with('(') {
        return None;
    }
    let mut stack = 0;
    for (i, c) in input[bracket_start..].char_indices() {
        if c == '(' {
            stack += 1;
        } else if c == ')' {
            stack -= 1;
            if stack == 0 {
                return Some(bracket_start + i);
            }
        }
    }
    None
}

/// characters after which a '+' or '-' can only be a sign
fn is_operator_or_open_bracket(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^' | '(')
}

/// `1e-3`: the sign belongs to the exponent of a numeric literal when the 'e' is preceded
/// by a token that starts like a number (digit or '.') and contains only digits and dots
fn is_exponent_sign(input: &str, sign_pos: usize) -> bool {
    let before = &input[..sign_pos];
    let Some(mantissa) = before.strip_suffix(['e', 'E']) else {
        return false;
    };
    let token_start = mantissa
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let token = &mantissa[token_start..];
    // the token must not be the tail of an identifier such as `x2e-1`
    let preceded_by_identifier = mantissa[..token_start]
        .chars()
        .next_back()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false);
    !token.is_empty() && token.chars().any(|c| c.is_ascii_digit()) && !preceded_by_identifier
}

/// true if the sign at `pos` is a binary operator rather than a unary sign
fn is_binary_sign(input: &str, pos: usize) -> bool {
    match input[..pos].chars().next_back() {
        None => false,
        Some(prev) if is_operator_or_open_bracket(prev) => false,
        Some(_) => !is_exponent_sign(input, pos),
    }
}

// function to find the rightmost occurrence of operators at the same precedence level
// outside of any brackets. Picking the last one makes chains like a-b-c left associative.
pub fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
) -> Option<(usize, char)> {
    let mut bracket_depth = 0;
    let mut last_op = None;

    for (i, c) in input.char_indices() {
        match c {
            '(' => bracket_depth += 1,
            ')' => bracket_depth -= 1,
            _ if bracket_depth == 0 && operators.contains(&c) => {
                let is_sign = c == '+' || c == '-';
                if !is_sign || is_binary_sign(input, i) {
                    last_op = Some((i, c));
                }
            }
            _ => {}
        }
    }

    last_op
}

/// `[A-Za-z_][A-Za-z0-9_]*`, unicode letters and digits included
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// finite difference derivative of a function of one argument
pub fn numerical_derivative<F>(f: F, x: f64, h: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let f_x_plus_h = f(x + h);
    let f_x_minus_h = f(x - h);
    (f_x_plus_h - f_x_minus_h) / (2.0 * h)
}
