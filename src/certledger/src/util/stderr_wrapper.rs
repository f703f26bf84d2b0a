use term::{Error, StderrTerminal, Terminal};

/// The colour-capable stderr terminal, or a plain stderr writer that ignores colour
/// requests when no terminal is attached.
pub fn stderr_wrapper() -> Box<StderrTerminal> {
    term::stderr().unwrap_or_else(|| {
        Box::new(PlainStderr {
            stderr: std::io::stderr(),
        })
    })
}

struct PlainStderr<W> {
    stderr: W,
}

impl<W: std::io::Write> Terminal for PlainStderr<W> {
    type Output = W;

    fn fg(&mut self, _color: term::color::Color) -> term::Result<()> {
        Ok(())
    }

    fn bg(&mut self, _color: term::color::Color) -> term::Result<()> {
        Ok(())
    }

    fn attr(&mut self, _attr: term::Attr) -> term::Result<()> {
        Ok(())
    }

    fn supports_attr(&self, _attr: term::Attr) -> bool {
        true
    }

    fn reset(&mut self) -> term::Result<()> {
        Ok(())
    }

    fn supports_reset(&self) -> bool {
        true
    }

    fn supports_color(&self) -> bool {
        false
    }

    fn cursor_up(&mut self) -> term::Result<()> {
        Err(Error::NotSupported)
    }

    fn delete_line(&mut self) -> term::Result<()> {
        Err(Error::NotSupported)
    }

    fn carriage_return(&mut self) -> term::Result<()> {
        Err(Error::NotSupported)
    }

    fn get_ref(&self) -> &Self::Output {
        &self.stderr
    }

    fn get_mut(&mut self) -> &mut Self::Output {
        &mut self.stderr
    }

    fn into_inner(self) -> Self::Output
    where
        Self: Sized,
    {
        self.stderr
    }
}

impl<W: std::io::Write> std::io::Write for PlainStderr<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stderr.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stderr.flush()
    }
}
