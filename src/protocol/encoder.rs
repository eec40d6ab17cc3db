//! Primitive Encoder
//!
//! Menulis tipe primitif protokol ke sembarang `io::Write`.
//! Semua integer multi-byte ditulis big-endian.
//!
//! Encoder bersifat *sticky*: begitu satu write gagal, semua `put_*`
//! berikutnya jadi no-op dan error pertama dikembalikan oleh [`Encoder::finish`].
//! Kode hasil generator bisa merangkai banyak `put_*` tanpa cek satu per satu.

use std::io::{self, Write};

use crate::error::{Error, Result};

/// Ukuran maksimum encoding varint 64-bit.
pub const MAX_VARINT_LEN: usize = 10;

/// Zigzag: sign bit dipindah ke LSB.
#[inline(always)]
pub(crate) fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// Encode varint ke `buf`, kembalikan jumlah byte yang terpakai.
#[inline(always)]
pub(crate) fn put_uvarint(buf: &mut [u8; MAX_VARINT_LEN], mut x: u64) -> usize {
    let mut i = 0;
    while x >= 0x80 {
        buf[i] = (x as u8) | 0x80;
        x >>= 7;
        i += 1;
    }
    buf[i] = x as u8;
    i + 1
}

/// Encoder dengan scratch buffer tetap dan sticky error.
pub struct Encoder<W: Write> {
    buf: [u8; MAX_VARINT_LEN],
    target: W,
    err: Option<Error>,
}

impl<W: Write> Encoder<W> {
    /// Membuat encoder di atas `target`.
    pub fn new(target: W) -> Self {
        Self {
            buf: [0u8; MAX_VARINT_LEN],
            target,
            err: None,
        }
    }

    /// Error pertama yang tercatat, jika ada.
    pub fn error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    #[inline(always)]
    pub fn is_failed(&self) -> bool {
        self.err.is_some()
    }

    /// Akses ke sink (misalnya untuk cek panjang `Vec`).
    pub fn get_ref(&self) -> &W {
        &self.target
    }

    /// Flush sink lalu kembalikan sink, atau error pertama yang tercatat.
    pub fn finish(mut self) -> Result<W> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }
        self.target.flush()?;
        Ok(self.target)
    }

    #[inline(always)]
    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            log::trace!("encoder write failed, further puts are ignored: {}", e);
            self.err = Some(Error::Io(e));
        }
    }

    #[inline(always)]
    fn write_scratch(&mut self, n: usize) {
        let result = self.target.write_all(&self.buf[..n]);
        self.record(result);
    }

    #[inline(always)]
    fn write_raw(&mut self, data: &[u8]) {
        let result = self.target.write_all(data);
        self.record(result);
    }

    /// Length prefix int32; panjang di atas `i32::MAX` jadi sticky error.
    #[inline(always)]
    fn put_length32(&mut self, kind: &'static str, len: usize) -> bool {
        match i32::try_from(len) {
            Ok(n) => {
                self.put_int32(n);
                !self.is_failed()
            }
            Err(_) => {
                self.err = Some(Error::Oversized { kind, len });
                false
            }
        }
    }

    pub fn put_bool(&mut self, b: bool) {
        self.put_int8(b as i8);
    }

    pub fn put_int8(&mut self, i: i8) {
        if self.err.is_some() {
            return;
        }
        self.buf[0] = i as u8;
        self.write_scratch(1);
    }

    pub fn put_int16(&mut self, i: i16) {
        if self.err.is_some() {
            return;
        }
        self.buf[..2].copy_from_slice(&i.to_be_bytes());
        self.write_scratch(2);
    }

    pub fn put_int32(&mut self, i: i32) {
        if self.err.is_some() {
            return;
        }
        self.buf[..4].copy_from_slice(&i.to_be_bytes());
        self.write_scratch(4);
    }

    pub fn put_int64(&mut self, i: i64) {
        if self.err.is_some() {
            return;
        }
        self.buf[..8].copy_from_slice(&i.to_be_bytes());
        self.write_scratch(8);
    }

    /// String: int16 panjang + UTF-8.
    pub fn put_string(&mut self, s: &str) {
        if self.err.is_some() {
            return;
        }
        let len = match i16::try_from(s.len()) {
            Ok(n) => n,
            Err(_) => {
                self.err = Some(Error::Oversized {
                    kind: "string",
                    len: s.len(),
                });
                return;
            }
        };
        self.put_int16(len);
        if self.err.is_none() {
            self.write_raw(s.as_bytes());
        }
    }

    /// `None` ditulis sebagai panjang `-1`.
    pub fn put_nullable_string(&mut self, s: Option<&str>) {
        match s {
            Some(s) => self.put_string(s),
            None => self.put_int16(-1),
        }
    }

    /// Bytes: int32 panjang + raw bytes; `None` ditulis sebagai `-1`.
    pub fn put_bytes(&mut self, data: Option<&[u8]>) {
        if self.err.is_some() {
            return;
        }
        let Some(data) = data else {
            self.put_int32(-1);
            return;
        };
        if self.put_length32("bytes", data.len()) {
            self.write_raw(data);
        }
    }

    /// Array generik: int32 jumlah elemen, lalu `f(self, i)` untuk tiap elemen.
    ///
    /// Kode generator memakai ini untuk array struct.
    pub fn put_array<F>(&mut self, n: usize, mut f: F)
    where
        F: FnMut(&mut Self, usize),
    {
        if self.err.is_some() {
            return;
        }
        if !self.put_length32("array", n) {
            return;
        }
        for i in 0..n {
            if self.err.is_some() {
                return;
            }
            f(self, i);
        }
    }

    /// Array `None` ditulis sebagai jumlah `-1`.
    pub fn put_nullable_array<T, F>(&mut self, items: Option<&[T]>, mut f: F)
    where
        F: FnMut(&mut Self, &T),
    {
        match items {
            Some(items) => self.put_array(items.len(), |e, i| f(e, &items[i])),
            None => self.put_int32(-1),
        }
    }

    pub fn put_int32_array(&mut self, items: Option<&[i32]>) {
        self.put_nullable_array(items, |e, v| e.put_int32(*v));
    }

    pub fn put_int64_array(&mut self, items: Option<&[i64]>) {
        self.put_nullable_array(items, |e, v| e.put_int64(*v));
    }

    pub fn put_string_array<S: AsRef<str>>(&mut self, items: Option<&[S]>) {
        self.put_nullable_array(items, |e, s| e.put_string(s.as_ref()));
    }

    /// Zigzag varint, 1-10 byte.
    pub fn put_varint(&mut self, i: i64) {
        if self.err.is_some() {
            return;
        }
        let n = put_uvarint(&mut self.buf, zigzag_encode(i));
        self.write_scratch(n);
    }

    /// Bytes dengan prefix panjang varint; `None` ditulis sebagai varint `-1`.
    pub fn put_var_bytes(&mut self, data: Option<&[u8]>) {
        if self.err.is_some() {
            return;
        }
        match data {
            Some(data) => {
                self.put_varint(data.len() as i64);
                if self.err.is_none() {
                    self.write_raw(data);
                }
            }
            None => self.put_varint(-1),
        }
    }

    pub fn put_var_string(&mut self, s: Option<&str>) {
        self.put_var_bytes(s.map(str::as_bytes));
    }
}
