//! The seam between the acquisition loop and whatever produces the bytes.
//!
//! Production runs read a serial character device; tests and simulations feed
//! lines through a channel. The loop only ever sees a [`LineSource`].

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Blocking, line-framed byte source.
///
/// `read_line` blocks until a full line is available. `Ok(None)` means the
/// source has been closed (clean end of stream); an `Err` is a genuine I/O
/// failure and is fatal to the acquisition loop. The underlying handle is
/// released when the source is dropped.
pub trait LineSource {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Line framing over any blocking byte reader.
pub struct ReaderSource<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }
}

impl<R: Read> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let n = self.reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Open a serial character device and configure it for raw line capture.
#[cfg(unix)]
pub fn open_serial(device: &Path, baudrate: u32) -> io::Result<ReaderSource<File>> {
    use std::os::fd::AsRawFd;

    let file = OpenOptions::new().read(true).open(device)?;
    let fd = file.as_raw_fd();
    let speed = baud_constant(baudrate)?;

    // SAFETY: fd is a valid open descriptor for the lifetime of `file`, and
    // tio is fully initialized by tcgetattr before being modified.
    unsafe {
        let mut tio: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut tio) != 0 {
            return Err(io::Error::last_os_error());
        }
        libc::cfmakeraw(&mut tio);
        tio.c_cflag |= libc::CREAD | libc::CLOCAL;
        // Block until at least one byte arrives, no inter-byte timeout.
        tio.c_cc[libc::VMIN] = 1;
        tio.c_cc[libc::VTIME] = 0;
        if libc::cfsetispeed(&mut tio, speed) != 0 || libc::cfsetospeed(&mut tio, speed) != 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &tio) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(ReaderSource::new(file))
}

#[cfg(unix)]
fn baud_constant(baudrate: u32) -> io::Result<libc::speed_t> {
    let speed = match baudrate {
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported baud rate: {baudrate}"),
            ))
        }
    };
    Ok(speed)
}

/// Source fed line-by-line from a channel, blocking like a real port.
///
/// Dropping all senders closes the stream; a sent `Err` is delivered to the
/// loop as a read failure. Used by tests and simulations in place of hardware.
pub struct ChannelSource {
    receiver: crossbeam::channel::Receiver<io::Result<Vec<u8>>>,
}

impl ChannelSource {
    pub fn new() -> (crossbeam::channel::Sender<io::Result<Vec<u8>>>, Self) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        (sender, Self { receiver })
    }
}

impl LineSource for ChannelSource {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self.receiver.recv() {
            Ok(Ok(line)) => Ok(Some(line)),
            Ok(Err(err)) => Err(err),
            Err(_) => Ok(None),
        }
    }
}
