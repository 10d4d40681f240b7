pub const RSA_CERT: &[u8] = include_bytes!("../tests/assets/rsa.der");
pub const EC_CERT: &[u8] = include_bytes!("../tests/assets/ec.der");
pub const V1_CERT: &[u8] = include_bytes!("../tests/assets/v1.der");

// Those helpers serves two purposes:
// - Ensure public types have expected impls: Clone, Debug, Send & Sync
// - Instrument those impls to avoid having those derive be marked as missed in coverage...
pub fn test_type_traits<T: Clone + std::fmt::Debug + Send + Sync>(t: T) {
    #[allow(clippy::redundant_clone)]
    let _r = t.clone();
    let _r = format!("{:?}", &t);
}

pub fn test_type_traits_non_clonable<T: std::fmt::Debug + Send + Sync>(t: T) {
    let _r = format!("{:?}", &t);
}
