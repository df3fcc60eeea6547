use rayon::prelude::*;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Produces a compressed (PNG) square image of a vector source at a given
/// pixel size.  The rasterizer owns its source; the icon encoders only call
/// [`render`](#tymethod.render) once per table entry and store the returned
/// bytes as-is.
///
/// Rendering is fanned out across threads, hence the `Sync` bound.
pub trait Rasterizer: Sync {
    /// Renders the source as a `pixel_size` by `pixel_size` image and
    /// returns the encoded file bytes.
    fn render(&self, pixel_size: u32) -> io::Result<Vec<u8>>;
}

impl<F> Rasterizer for F
where
    F: Fn(u32) -> io::Result<Vec<u8>> + Sync,
{
    fn render(&self, pixel_size: u32) -> io::Result<Vec<u8>> {
        self(pixel_size)
    }
}

/// The failure of one entry in a [`render_all`] call.
#[derive(Debug)]
pub(crate) struct RenderFailure {
    /// Position of the failing size in the requested list.
    pub index: usize,
    pub error: io::Error,
}

/// Renders every size in `sizes` and returns the payloads in the same
/// order.  Sizes are rendered in parallel.  When any render fails, sizes
/// after it that have not started yet are skipped, and the failure with
/// the lowest index is returned regardless of which finished first.
pub(crate) fn render_all<R>(rasterizer: &R,
                            sizes: &[u32])
                            -> Result<Vec<Vec<u8>>, RenderFailure>
    where R: Rasterizer + ?Sized
{
    let first_failure = AtomicUsize::new(usize::MAX);
    let results: Vec<Option<io::Result<Vec<u8>>>> = sizes
        .par_iter()
        .enumerate()
        .map(|(index, &size)| {
            if index > first_failure.load(Ordering::Acquire) {
                return None;
            }
            let result = rasterizer.render(size);
            match result {
                Ok(ref data) => {
                    tracing::debug!("rendered {}x{} ({} bytes)",
                                    size,
                                    size,
                                    data.len());
                }
                Err(ref error) => {
                    tracing::debug!("rendering {}x{} failed: {}",
                                    size,
                                    size,
                                    error);
                    first_failure.fetch_min(index, Ordering::AcqRel);
                }
            }
            Some(result)
        })
        .collect();

    let mut payloads = Vec::with_capacity(sizes.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Some(Ok(data)) => payloads.push(data),
            Some(Err(error)) => return Err(RenderFailure { index, error }),
            // Only entries after a recorded failure are skipped, and that
            // failure is reached first.
            None => unreachable!(),
        }
    }
    Ok(payloads)
}
