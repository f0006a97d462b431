mod index;
mod recording;

pub use index::Index;
pub use recording::Recording;
