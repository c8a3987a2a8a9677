use log::warn;

/// Separators tried in order; a split that is still too large is re-split
/// with the remaining separators.
const SEPARATORS: &[&str] = &["\n\n", "\n"];

/// Recursive character text splitter.
///
/// Produces consecutive chunks of at most `chunk_size` characters,
/// preferring paragraph breaks over line breaks, with the trailing
/// `chunk_overlap` characters of each chunk re-included at the head of the
/// next one to preserve context across boundaries.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_overlap < chunk_size, "overlap must be smaller than chunk size");
        TextSplitter {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // First separator that actually occurs in the text wins; the rest
        // are kept for recursing into oversized splits.
        let (index, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| text.contains(*sep))
            .map(|(i, sep)| (i, *sep))
            .unwrap_or((separators.len() - 1, separators[separators.len() - 1]));
        let remaining = &separators[index + 1..];

        let splits: Vec<&str> = text.split(separator).filter(|s| !s.is_empty()).collect();

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();

        for piece in splits {
            if piece.len() < self.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                chunks.extend(self.merge(&small, separator));
                small.clear();
            }
            if remaining.is_empty() {
                // No finer separator left; emit oversized piece as-is
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_with(piece, remaining));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge(&small, separator));
        }

        chunks
    }

    /// Greedily pack adjacent splits into chunks, carrying up to
    /// `chunk_overlap` trailing characters into the next chunk.
    fn merge(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let sep_len = separator.len();
        let mut chunks = Vec::new();
        let mut window: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = piece.len();
            let joint = if window.is_empty() { 0 } else { sep_len };
            if total + len + joint > self.chunk_size {
                if total > self.chunk_size {
                    warn!("chunk of size {total} exceeds target {}", self.chunk_size);
                }
                if !window.is_empty() {
                    if let Some(chunk) = join_window(&window, separator) {
                        chunks.push(chunk);
                    }
                    // Slide the window until the carried tail fits the overlap
                    // and leaves room for the incoming piece
                    while total > self.chunk_overlap
                        || (total > 0
                            && total + len + (if window.is_empty() { 0 } else { sep_len }) > self.chunk_size)
                    {
                        let front = window.pop_front().expect("window is non-empty while total > 0");
                        total -= front.len() + (if window.is_empty() { 0 } else { sep_len });
                    }
                }
            }
            window.push_back(piece);
            total += len + if window.len() > 1 { sep_len } else { 0 };
        }

        if let Some(chunk) = join_window(&window, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

fn join_window(window: &std::collections::VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
