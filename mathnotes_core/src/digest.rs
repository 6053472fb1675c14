use std::hash::{DefaultHasher, Hash, Hasher};

pub type DigestOutput = u64;

pub trait Digestible {
    fn digest(&self) -> DigestOutput;
}

/// Digests any hashable value with the standard library's hasher. Stable
/// within a process, which is all a refresh comparison needs.
pub fn hash_digest<T: Hash + ?Sized>(value: &T) -> DigestOutput {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
