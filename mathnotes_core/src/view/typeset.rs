use thiserror::Error;

/// Turns formula markup into something that can be displayed.
pub trait Typesetter {
    fn typeset(&self, markup: &str) -> Result<String, TypesetError>;
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TypesetError {
    #[error("Unexpected '}}' at {0}.")]
    UnexpectedClose(usize),
    #[error("Missing '}}' for the '{{' at {0}.")]
    UnclosedGroup(usize),
    #[error("Expected a command after '\\' at {0}.")]
    DanglingBackslash(usize),
}

/// What the preview box shows for the current form input.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Preview {
    /// There is no input yet.
    Placeholder,
    Rendered(String),
    /// The markup could not be typeset; shown in place of the formula.
    Error(String),
}

/// Typesets `markup` for display. Typesetting failures become
/// [`Preview::Error`] and never propagate further.
pub fn preview(typesetter: &dyn Typesetter, markup: &str) -> Preview {
    if markup.is_empty() {
        return Preview::Placeholder;
    }
    match typesetter.typeset(markup) {
        Ok(rendered) => Preview::Rendered(rendered),
        Err(err) => Preview::Error(err.to_string()),
    }
}

/// Renders LaTeX as plain Unicode text, for terminals. It understands groups,
/// common symbol commands and single-character super- and subscripts; other
/// commands are shown by name.
#[derive(Debug, Default, Copy, Clone)]
pub struct PlainTypesetter;

impl Typesetter for PlainTypesetter {
    fn typeset(&self, markup: &str) -> Result<String, TypesetError> {
        let mut out = String::with_capacity(markup.len());
        let mut open_groups = Vec::new();
        let mut chars = markup.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => open_groups.push(pos),
                '}' => {
                    open_groups.pop().ok_or(TypesetError::UnexpectedClose(pos))?;
                }
                '\\' => {
                    let mut name = String::new();
                    while let Some(&(_, next)) = chars.peek() {
                        if !next.is_ascii_alphabetic() {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    if name.is_empty() {
                        // a control symbol such as `\,` or `\{`
                        let (_, symbol) = chars.next().ok_or(TypesetError::DanglingBackslash(pos))?;
                        match symbol {
                            ',' | ';' | ':' | '!' | ' ' => out.push(' '),
                            '\\' => out.push('\n'),
                            other => out.push(other),
                        }
                    } else {
                        match command_symbol(&name) {
                            Some(symbol) => out.push_str(symbol),
                            None => out.push_str(&name),
                        }
                    }
                }
                '^' | '_' => {
                    let script = if c == '^' { superscript } else { subscript };
                    match chars.peek() {
                        Some(&(_, next)) if script(next).is_some() => {
                            out.extend(script(next));
                            chars.next();
                        }
                        _ => out.push(c),
                    }
                }
                other => out.push(other),
            }
        }

        match open_groups.first() {
            Some(&pos) => Err(TypesetError::UnclosedGroup(pos)),
            None => Ok(out),
        }
    }
}

fn command_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "Delta" => "Δ",
        "epsilon" => "ε",
        "theta" => "θ",
        "lambda" => "λ",
        "mu" => "μ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "Sigma" => "Σ",
        "phi" => "φ",
        "omega" => "ω",
        "Omega" => "Ω",
        "cdot" => "·",
        "times" => "×",
        "div" => "÷",
        "pm" => "±",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "infty" => "∞",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "partial" => "∂",
        "nabla" => "∇",
        "sqrt" => "√",
        "to" | "rightarrow" => "→",
        "Rightarrow" => "⇒",
        "in" => "∈",
        "frac" | "left" | "right" | "mathrm" | "text" => "",
        _ => return None,
    })
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        'n' => 'ⁿ',
        _ => return None,
    })
}

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn plain(markup: &str) -> Result<String, TypesetError> {
        PlainTypesetter.typeset(markup)
    }

    #[test]
    fn symbols_and_scripts() {
        assert_eq!(plain("\\pi r^2").unwrap(), "π r²");
        assert_eq!(plain("a_1 + a_n").unwrap(), "a₁ + a_n");
        assert_eq!(plain("E = mc^{2}").unwrap(), "E = mc^2");
        assert_eq!(plain("\\frac{a}{b}").unwrap(), "ab");
        assert_eq!(plain("\\operatorname").unwrap(), "operatorname");
        assert_eq!(plain("a\\,b\\{c\\}").unwrap(), "a b{c}");
    }

    #[test]
    fn malformed_markup_is_reported() {
        assert_eq!(plain("x}"), Err(TypesetError::UnexpectedClose(1)));
        assert_eq!(plain("\\frac{a}{b"), Err(TypesetError::UnclosedGroup(8)));
        assert_eq!(plain("x\\"), Err(TypesetError::DanglingBackslash(1)));
    }

    #[test]
    fn preview_states() {
        assert_eq!(preview(&PlainTypesetter, ""), Preview::Placeholder);
        assert_eq!(preview(&PlainTypesetter, "x^2"), Preview::Rendered("x²".to_string()));
        assert!(matches!(preview(&PlainTypesetter, "{"), Preview::Error(_)));
    }
}
