pub mod checksum;
pub mod fs;
