use crate::config::PlugConfig;
use crate::error::PlugError;
use crate::record::LogRecord;

/// Turns a parsed [`LogRecord`] into output.
///
/// Encoders are shared by every line written through a
/// [`Plug`](crate::plug::Plug), so they must be `Send + Sync` and keep any
/// mutable state behind their own synchronization.
pub trait Encoder: Send + Sync {
    /// Encode one record.
    ///
    /// **Parameters**
    /// - `config`: the plug configuration (field names, flags).
    /// - `record`: the parsed line; hooks may change it before delegating.
    ///
    /// **Returns**
    /// - `Ok(())` when the record was written or deliberately dropped.
    /// - `Err(..)` when the line could not be written; the plug hands the
    ///   error back to the writer of the line unchanged.
    fn encode(&self, config: &PlugConfig, record: &mut LogRecord) -> Result<(), PlugError>;
}

pub type BoxEncoder = Box<dyn Encoder>;

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn encode(&self, config: &PlugConfig, record: &mut LogRecord) -> Result<(), PlugError> {
        (**self).encode(config, record)
    }
}

/// Adapter that lets a closure act as an [`Encoder`].
pub struct EncoderFn<F>(pub F);

impl<F> Encoder for EncoderFn<F>
where
    F: Fn(&PlugConfig, &mut LogRecord) -> Result<(), PlugError> + Send + Sync,
{
    fn encode(&self, config: &PlugConfig, record: &mut LogRecord) -> Result<(), PlugError> {
        (self.0)(config, record)
    }
}

/// Build an [`EncoderFn`] from a closure.
pub fn encoder_fn<F>(f: F) -> EncoderFn<F>
where
    F: Fn(&PlugConfig, &mut LogRecord) -> Result<(), PlugError> + Send + Sync,
{
    EncoderFn(f)
}

/// Wraps one encoder in another.
///
/// Hooks run once, when the plug is built.
pub type Hook = Box<dyn FnOnce(BoxEncoder) -> BoxEncoder + Send>;

/// Box a closure as a [`Hook`].
pub fn hook<F>(f: F) -> Hook
where
    F: FnOnce(BoxEncoder) -> BoxEncoder + Send + 'static,
{
    Box::new(f)
}

/// Fold `hooks` over `terminal`.
///
/// The first hook ends up outermost, so hooks see each record in
/// registration order and `terminal` sees it last.
pub fn build_chain(terminal: BoxEncoder, hooks: Vec<Hook>) -> BoxEncoder {
    hooks.into_iter().rev().fold(terminal, |inner, wrap| wrap(inner))
}
