pub mod material;

pub use material::{check_bit_len, private_key_bit_len, read_material, CertificateMaterial};
