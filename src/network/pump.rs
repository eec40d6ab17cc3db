//! I/O Pump: thread khusus yang memindahkan byte dari socket ke ring buffer.
//!
//! Thread pump memegang [`RingWriter`]. Apa pun alasan pump berhenti (EOF,
//! I/O error, ring ditutup), writer di-drop dan ring ikut tertutup, jadi
//! thread decode tidak pernah menunggu selamanya.
//!
//! Varian TCP memakai mio dengan poll timeout supaya pump tetap menyadari
//! `close()` walaupun peer diam.
//!
//! Drop [`Pump`] hanya melepas thread; stream tetap mengalir sampai EOF,
//! error, atau sisi pembaca menutup ring.

use std::io::{self, Read};
use std::net::TcpStream;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mio::net::TcpStream as MioTcpStream;
use mio::{Events, Interest, Poll, Token};

use crate::config::StreamConfig;
use crate::core::{CloseHandle, RingWriter};
use crate::error::{Error, Result};

const SOCKET_TOKEN: Token = Token(0);
const EVENTS_CAPACITY: usize = 16;

/// Handle ke thread pump yang sedang berjalan.
pub struct Pump {
    handle: JoinHandle<Result<u64>>,
    closer: CloseHandle,
}

impl Pump {
    /// Pump dari sembarang `Read` yang blocking.
    ///
    /// `close()` baru terlihat setelah `read()` berikutnya kembali, jadi
    /// untuk socket pakai [`Pump::spawn_tcp`].
    pub fn spawn_reader<R>(source: R, writer: RingWriter, config: &StreamConfig) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let closer = writer.closer();
        let chunk = config.read_chunk;
        let handle = thread::Builder::new()
            .name("kwire-pump".into())
            .spawn(move || pump_blocking(source, writer, chunk))?;
        Ok(Self { handle, closer })
    }

    /// Pump dari TCP socket dengan readiness polling (mio).
    pub fn spawn_tcp(stream: TcpStream, writer: RingWriter, config: &StreamConfig) -> Result<Self> {
        stream.set_nonblocking(true)?;
        let closer = writer.closer();
        let chunk = config.read_chunk;
        let interval = config.poll_interval;
        let handle = thread::Builder::new()
            .name("kwire-tcp-pump".into())
            .spawn(move || pump_tcp(stream, writer, chunk, interval))?;
        Ok(Self { handle, closer })
    }

    /// Minta pump berhenti. Tidak menunggu thread selesai.
    pub fn close(&self) {
        self.closer.close();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Tunggu pump selesai; kembalikan total byte yang dipindahkan.
    pub fn join(self) -> Result<u64> {
        self.handle
            .join()
            .map_err(|_| Error::Io(io::Error::new(io::ErrorKind::Other, "pump thread panicked")))?
    }
}

fn pump_blocking<R: Read>(mut source: R, mut writer: RingWriter, chunk: usize) -> Result<u64> {
    log::debug!("pump started (chunk={})", chunk);
    let mut buf = vec![0u8; chunk];
    let mut total = 0u64;

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => {
                log::debug!("pump source reached EOF after {} bytes", total);
                break;
            }
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("pump read failed after {} bytes: {}", total, e);
                return Err(e.into());
            }
        };

        if !writer.write_n(&buf, n).is_complete() {
            log::debug!("ring closed, pump stopping after {} bytes", total);
            break;
        }
        total += n as u64;
    }

    Ok(total)
}

fn pump_tcp(
    stream: TcpStream,
    mut writer: RingWriter,
    chunk: usize,
    interval: Duration,
) -> Result<u64> {
    let mut stream = MioTcpStream::from_std(stream);
    let mut poll = Poll::new()?;
    poll.registry()
        .register(&mut stream, SOCKET_TOKEN, Interest::READABLE)?;

    let peer = stream.peer_addr().ok();
    log::debug!("tcp pump started (peer={:?}, chunk={})", peer, chunk);

    let mut events = Events::with_capacity(EVENTS_CAPACITY);
    let mut buf = vec![0u8; chunk];
    let mut total = 0u64;

    while !writer.is_closed() {
        match poll.poll(&mut events, Some(interval)) {
            Ok(()) => {}
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }

        if events.is_empty() {
            continue; // Timeout, cek ulang apakah ring sudah ditutup
        }

        // Edge-triggered: baca sampai WouldBlock
        loop {
            match stream.read(&mut buf) {
                Ok(0) => {
                    log::debug!("tcp pump: peer {:?} closed after {} bytes", peer, total);
                    return Ok(total);
                }
                Ok(n) => {
                    if !writer.write_n(&buf, n).is_complete() {
                        log::debug!("ring closed, tcp pump stopping after {} bytes", total);
                        return Ok(total);
                    }
                    total += n as u64;
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("tcp pump read from {:?} failed: {}", peer, e);
                    return Err(e.into());
                }
            }
        }
    }

    log::debug!("tcp pump closed after {} bytes", total);
    Ok(total)
}
