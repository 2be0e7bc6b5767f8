//! Depth-tracked scan over the argument list of a single operator call.

/// Shape of an argument list after locating its top-level comma
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSplit {
    Single,
    /// Byte index of the top-level comma within the scanned text
    Pair { comma: usize },
}

impl ArgumentSplit {
    pub fn count(self) -> usize {
        match self {
            ArgumentSplit::Single => 1,
            ArgumentSplit::Pair { .. } => 2,
        }
    }
}

/// Structural defect found while scanning; offsets are byte indices into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// A `)` with no matching `(` inside the argument list
    UnmatchedClose { at: usize },
    /// The outermost `(` left open when the argument list ended
    UnclosedOpen { at: usize },
    /// A second top-level comma
    ExtraArgument { at: usize },
}

/// Splits the text between an operator's `(` and its final `)`.
///
/// Only commas at depth 0 relative to `inner` count; commas of nested calls are skipped.
pub fn split_arguments(inner: &str) -> Result<ArgumentSplit, ScanError> {
    let mut depth = 0usize;
    let mut outer_open = 0;
    let mut comma = None;

    // Delimiters are ASCII, so byte scanning never lands inside a multi-byte char.
    for (i, byte) in inner.bytes().enumerate() {
        match byte {
            b'(' => {
                if depth == 0 {
                    outer_open = i;
                }
                depth += 1;
            }
            b')' => {
                if depth == 0 {
                    return Err(ScanError::UnmatchedClose { at: i });
                }
                depth -= 1;
            }
            b',' if depth == 0 => {
                if comma.is_some() {
                    return Err(ScanError::ExtraArgument { at: i });
                }
                comma = Some(i);
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ScanError::UnclosedOpen { at: outer_open });
    }

    Ok(match comma {
        Some(comma) => ArgumentSplit::Pair { comma },
        None => ArgumentSplit::Single,
    })
}
