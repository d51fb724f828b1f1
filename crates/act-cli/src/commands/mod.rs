pub mod codec_ops;
pub mod config_ops;
pub mod dict_ops;
pub mod shell;

/// Text files may be UTF-8 or raw Latin-1. Valid UTF-8 is transcoded;
/// anything else is taken as Latin-1 bytes unchanged.
pub fn text_to_latin1(bytes: Vec<u8>) -> Vec<u8> {
    match String::from_utf8(bytes) {
        Ok(text) => act_engine::latin1::encode_lossy(&text),
        Err(e) => e.into_bytes(),
    }
}
