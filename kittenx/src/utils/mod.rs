pub mod hf_cache;
pub mod wav;
