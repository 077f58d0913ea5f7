use derive_builder::Builder;

/// How `decode_execute` treats the command stream.
///
/// ```
/// use router_decoder::universal_router_sdk::options::DecoderOptionsBuilder;
///
/// let options = DecoderOptionsBuilder::default()
///     .honor_flag_bits(true)
///     .build()
///     .unwrap();
/// assert!(options.require_aligned_inputs);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DecoderOptions {
    /// Look commands up by their low six bits and report the allow-revert flag.
    /// Off by default: only the exact registered bytes decode, so a command
    /// byte with flag bits set is treated as unregistered.
    #[builder(default = "false")]
    pub honor_flag_bits: bool,
    /// Reject the whole call when the command and input counts differ.
    /// When off, a registered command without an input fails on its own.
    #[builder(default = "true")]
    pub require_aligned_inputs: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            honor_flag_bits: false,
            require_aligned_inputs: true,
        }
    }
}
