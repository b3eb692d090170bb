//! Byte sources the decoder can pull from.
//!
//! Two concrete forms exist: a borrowed in-memory buffer and a pull
//! callback for callers that stream from a file, socket or anything
//! else. Both hand out exactly the bytes asked for or fail with
//! [`SourceEnd`](PngErrors::SourceEnd).

use crate::error::PngErrors;

/// Pull callback for streaming sources.
///
/// The callback must fill the whole destination slice, returning
/// [`SourceEnd`](PngErrors::SourceEnd) when the input is exhausted or
/// [`SourceError`](PngErrors::SourceError) for I/O failures.
pub type ReadFn<'a> = Box<dyn FnMut(&mut [u8]) -> Result<(), PngErrors> + 'a>;

enum SourceKind<'a>
{
    None,
    Buffer
    {
        data:     &'a [u8],
        position: usize
    },
    Stream(ReadFn<'a>)
}

pub(crate) struct ByteSource<'a>
{
    kind:       SourceKind<'a>,
    scratch:    Vec<u8>,
    bytes_read: u64
}

impl<'a> ByteSource<'a>
{
    pub fn new() -> ByteSource<'a>
    {
        ByteSource {
            kind:       SourceKind::None,
            scratch:    Vec::new(),
            bytes_read: 0
        }
    }

    pub fn is_set(&self) -> bool
    {
        !matches!(self.kind, SourceKind::None)
    }

    /// Attach an in-memory buffer. Fails if a source is already
    /// attached.
    pub fn set_buffer(&mut self, data: &'a [u8]) -> Result<(), PngErrors>
    {
        if self.is_set()
        {
            return Err(PngErrors::BufferAlreadySet);
        }
        self.kind = SourceKind::Buffer { data, position: 0 };

        Ok(())
    }

    /// Attach a pull callback. Fails if a source is already attached.
    pub fn set_stream(&mut self, read_fn: ReadFn<'a>) -> Result<(), PngErrors>
    {
        if self.is_set()
        {
            return Err(PngErrors::BufferAlreadySet);
        }
        self.kind = SourceKind::Stream(read_fn);

        Ok(())
    }

    /// Read exactly `n` bytes.
    ///
    /// The returned slice stays valid until the next read.
    pub fn read_exact(&mut self, n: usize) -> Result<&[u8], PngErrors>
    {
        match &mut self.kind
        {
            SourceKind::None => Err(PngErrors::Invalid),
            SourceKind::Buffer { data, position } =>
            {
                if data.len() - *position < n
                {
                    return Err(PngErrors::SourceEnd);
                }
                let out = &data[*position..*position + n];

                *position += n;
                self.bytes_read += n as u64;

                Ok(out)
            }
            SourceKind::Stream(read_fn) =>
            {
                if self.scratch.len() < n
                {
                    self.scratch.resize(n, 0);
                }
                read_fn(&mut self.scratch[..n])?;

                self.bytes_read += n as u64;

                Ok(&self.scratch[..n])
            }
        }
    }

    /// Total bytes handed out so far.
    pub const fn bytes_read(&self) -> u64
    {
        self.bytes_read
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn buffer_reads_advance_and_end()
    {
        let data = [1_u8, 2, 3, 4, 5];
        let mut source = ByteSource::new();

        source.set_buffer(&data).unwrap();

        assert_eq!(source.read_exact(2).unwrap(), &[1, 2]);
        assert_eq!(source.read_exact(3).unwrap(), &[3, 4, 5]);
        assert_eq!(source.bytes_read(), 5);
        assert_eq!(source.read_exact(1), Err(PngErrors::SourceEnd));
    }

    #[test]
    fn second_attach_is_rejected()
    {
        let data = [0_u8; 4];
        let mut source = ByteSource::new();

        source.set_buffer(&data).unwrap();

        assert_eq!(source.set_buffer(&data), Err(PngErrors::BufferAlreadySet));
        assert_eq!(
            source.set_stream(Box::new(|_| Ok(()))),
            Err(PngErrors::BufferAlreadySet)
        );
    }

    #[test]
    fn stream_source_pulls_from_callback()
    {
        let data: Vec<u8> = (0..32).collect();
        let mut position = 0;

        let read_fn: ReadFn = Box::new(move |dest| {
            if data.len() - position < dest.len()
            {
                return Err(PngErrors::SourceEnd);
            }
            dest.copy_from_slice(&data[position..position + dest.len()]);
            position += dest.len();
            Ok(())
        });

        let mut source = ByteSource::new();
        source.set_stream(read_fn).unwrap();

        assert_eq!(source.read_exact(4).unwrap(), &[0, 1, 2, 3]);
        assert_eq!(source.read_exact(2).unwrap(), &[4, 5]);
        assert_eq!(source.bytes_read(), 6);
    }
}
