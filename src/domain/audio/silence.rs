/// True when every byte of the buffer is zero (and for an empty buffer).
///
/// Only the exact all-zero output the synthesis service returns for
/// unspeakable input is caught, quiet audio is not.
pub fn is_silence(pcm: &[u8]) -> bool {
    pcm.iter().all(|&b| b == 0)
}
