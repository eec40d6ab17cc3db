//! Zero-copy Primitive Decoder
//!
//! Membaca tipe primitif protokol dari slice byte. String dan bytes
//! dikembalikan sebagai referensi ke buffer asli, tanpa copy.
//!
//! Setiap error bersifat terminal: offset dipaksa ke akhir buffer supaya
//! semua `get_*` berikutnya langsung gagal, tidak membaca state yang korup.

use crate::error::{Error, Result};

use super::encoder::MAX_VARINT_LEN;

/// Zigzag decode.
#[inline(always)]
pub(crate) fn zigzag_decode(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Decoder di atas slice byte.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    raw: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    #[inline(always)]
    pub fn new(raw: &'a [u8]) -> Self {
        Self { raw, offset: 0 }
    }

    /// Byte yang belum dibaca.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.raw.len() - self.offset
    }

    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Sisa buffer yang belum dibaca.
    pub fn rest(&self) -> &'a [u8] {
        &self.raw[self.offset..]
    }

    /// Jalankan `f`; jika gagal, offset dipin ke akhir buffer.
    #[inline(always)]
    fn guard<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = f(self);
        if result.is_err() {
            self.offset = self.raw.len();
        }
        result
    }

    /// Ambil `n` byte berikutnya dan majukan offset.
    #[inline(always)]
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(Error::InsufficientData {
                needed: n,
                remaining,
            });
        }
        let raw: &'a [u8] = self.raw;
        let v = &raw[self.offset..self.offset + n];
        self.offset += n;
        Ok(v)
    }

    #[inline(always)]
    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Prefix panjang: `Ok(None)` untuk `-1`, error untuk negatif lainnya.
    #[inline(always)]
    fn length(n: i64) -> Result<Option<usize>> {
        match n {
            -1 => Ok(None),
            n if n < 0 => Err(Error::InvalidLength(n)),
            n => Ok(Some(n as usize)),
        }
    }

    /// Hanya byte `1` yang dianggap `true`.
    pub fn get_bool(&mut self) -> Result<bool> {
        self.guard(|d| Ok(d.take_array::<1>()?[0] == 1))
    }

    pub fn get_int8(&mut self) -> Result<i8> {
        self.guard(|d| Ok(i8::from_be_bytes(d.take_array()?)))
    }

    pub fn get_int16(&mut self) -> Result<i16> {
        self.guard(|d| Ok(i16::from_be_bytes(d.take_array()?)))
    }

    pub fn get_int32(&mut self) -> Result<i32> {
        self.guard(|d| Ok(i32::from_be_bytes(d.take_array()?)))
    }

    pub fn get_int64(&mut self) -> Result<i64> {
        self.guard(|d| Ok(i64::from_be_bytes(d.take_array()?)))
    }

    /// String non-nullable. Prefix `-1` menghasilkan [`Error::NullString`].
    pub fn get_string(&mut self) -> Result<&'a str> {
        self.guard(|d| d.get_nullable_string_inner()?.ok_or(Error::NullString))
    }

    /// String nullable. Prefix `-1` menghasilkan `None` tanpa error.
    pub fn get_nullable_string(&mut self) -> Result<Option<&'a str>> {
        self.guard(Self::get_nullable_string_inner)
    }

    fn get_nullable_string_inner(&mut self) -> Result<Option<&'a str>> {
        let n = i16::from_be_bytes(self.take_array()?);
        match Self::length(n as i64)? {
            Some(len) => Ok(Some(std::str::from_utf8(self.take(len)?)?)),
            None => Ok(None),
        }
    }

    /// Bytes dengan prefix int32. Prefix `-1` menghasilkan `None`.
    pub fn get_bytes(&mut self) -> Result<Option<&'a [u8]>> {
        self.guard(|d| {
            let n = i32::from_be_bytes(d.take_array()?);
            match Self::length(n as i64)? {
                Some(len) => Ok(Some(d.take(len)?)),
                None => Ok(None),
            }
        })
    }

    /// Jumlah elemen array apa adanya (termasuk `-1`).
    pub fn get_array_length(&mut self) -> Result<i32> {
        self.get_int32()
    }

    /// Array generik: `f` dipanggil sekali per elemen.
    ///
    /// `None` untuk jumlah `-1`; jumlah `0` menghasilkan `Some(vec![])`.
    pub fn get_array<T, F>(&mut self, mut f: F) -> Result<Option<Vec<T>>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        self.guard(|d| {
            let n = i32::from_be_bytes(d.take_array()?);
            let Some(n) = Self::length(n as i64)? else {
                return Ok(None);
            };
            // Jumlah elemen dari wire tidak dipercaya untuk alokasi awal
            let mut items = Vec::with_capacity(n.min(d.remaining()));
            for _ in 0..n {
                items.push(f(d)?);
            }
            Ok(Some(items))
        })
    }

    pub fn get_int32_array(&mut self) -> Result<Option<Vec<i32>>> {
        self.get_array(|d| d.get_int32())
    }

    pub fn get_int64_array(&mut self) -> Result<Option<Vec<i64>>> {
        self.get_array(|d| d.get_int64())
    }

    pub fn get_string_array(&mut self) -> Result<Option<Vec<&'a str>>> {
        self.get_array(|d| d.get_string())
    }

    /// Zigzag varint, maksimal 10 byte.
    pub fn get_varint(&mut self) -> Result<i64> {
        self.guard(|d| {
            let mut x: u64 = 0;
            let mut shift = 0u32;
            for i in 0..MAX_VARINT_LEN {
                let Some(&b) = d.raw.get(d.offset + i) else {
                    return Err(Error::InsufficientData {
                        needed: i + 1,
                        remaining: d.remaining(),
                    });
                };
                if b < 0x80 {
                    if i == MAX_VARINT_LEN - 1 && b > 1 {
                        return Err(Error::VarIntOverflow);
                    }
                    d.offset += i + 1;
                    return Ok(zigzag_decode(x | (b as u64) << shift));
                }
                x |= ((b & 0x7f) as u64) << shift;
                shift += 7;
            }
            // 10 byte lanjutan: overflow hanya jika memang ada byte ke-11
            if d.remaining() > MAX_VARINT_LEN {
                return Err(Error::VarIntOverflow);
            }
            Err(Error::InsufficientData {
                needed: MAX_VARINT_LEN + 1,
                remaining: d.remaining(),
            })
        })
    }

    /// Bytes dengan prefix varint. Prefix `-1` menghasilkan `None`.
    pub fn get_var_bytes(&mut self) -> Result<Option<&'a [u8]>> {
        self.guard(|d| {
            let n = d.get_varint()?;
            match Self::length(n)? {
                Some(len) => Ok(Some(d.take(len)?)),
                None => Ok(None),
            }
        })
    }

    pub fn get_var_string(&mut self) -> Result<Option<&'a str>> {
        self.guard(|d| match d.get_var_bytes()? {
            Some(raw) => Ok(Some(std::str::from_utf8(raw)?)),
            None => Ok(None),
        })
    }
}
