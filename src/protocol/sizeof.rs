//! Ukuran encoding tiap tipe primitif, dalam byte.
//!
//! Dipakai kode generator untuk menghitung length prefix frame
//! sebelum encode. Nilai di sini harus sama persis dengan output [`Encoder`].
//!
//! [`Encoder`]: super::Encoder

use super::encoder::{put_uvarint, zigzag_encode, MAX_VARINT_LEN};

pub const BOOL: i32 = 1;
pub const INT8: i32 = 1;
pub const INT16: i32 = 2;
pub const INT32: i32 = 4;
pub const INT64: i32 = 8;
pub const ARRAY_LENGTH: i32 = INT32;

/// Panjang `usize` sebagai int32, saturasi di `i32::MAX`.
///
/// Input sebesar itu ditolak [`Encoder`] dengan `Oversized`, jadi ukuran
/// yang tersaturasi tidak pernah benar-benar ditulis.
///
/// [`Encoder`]: super::Encoder
#[inline]
fn len_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// int32 panjang + isi; `None` hanya prefix.
pub fn bytes(data: Option<&[u8]>) -> i32 {
    ARRAY_LENGTH.saturating_add(data.map_or(0, |d| len_i32(d.len())))
}

/// int16 panjang + isi.
pub fn string(s: &str) -> i32 {
    INT16.saturating_add(len_i32(s.len()))
}

pub fn nullable_string(s: Option<&str>) -> i32 {
    s.map_or(INT16, string)
}

pub fn int32_array(items: Option<&[i32]>) -> i32 {
    ARRAY_LENGTH.saturating_add(items.map_or(0, |ii| len_i32(ii.len()).saturating_mul(INT32)))
}

pub fn int64_array(items: Option<&[i64]>) -> i32 {
    ARRAY_LENGTH.saturating_add(items.map_or(0, |ii| len_i32(ii.len()).saturating_mul(INT64)))
}

pub fn string_array<S: AsRef<str>>(items: Option<&[S]>) -> i32 {
    ARRAY_LENGTH.saturating_add(items.map_or(0, |ss| {
        ss.iter()
            .fold(0i32, |acc, s| acc.saturating_add(string(s.as_ref())))
    }))
}

/// Panjang zigzag varint untuk `i`.
pub fn varint(i: i64) -> i32 {
    let mut buf = [0u8; MAX_VARINT_LEN];
    put_uvarint(&mut buf, zigzag_encode(i)) as i32
}

pub fn var_bytes(data: Option<&[u8]>) -> i32 {
    match data {
        Some(d) => varint(d.len() as i64).saturating_add(len_i32(d.len())),
        None => varint(-1),
    }
}

pub fn var_string(s: Option<&str>) -> i32 {
    var_bytes(s.map(str::as_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Encoder;

    fn encoded_len(f: impl FnOnce(&mut Encoder<Vec<u8>>)) -> i32 {
        let mut encoder = Encoder::new(Vec::new());
        f(&mut encoder);
        encoder.finish().unwrap().len() as i32
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(encoded_len(|e| e.put_bool(true)), BOOL);
        assert_eq!(encoded_len(|e| e.put_int8(1)), INT8);
        assert_eq!(encoded_len(|e| e.put_int16(1)), INT16);
        assert_eq!(encoded_len(|e| e.put_int32(1)), INT32);
        assert_eq!(encoded_len(|e| e.put_int64(1)), INT64);
    }

    #[test]
    fn test_variable_sizes_match_encoder() {
        let data = b"hello";
        assert_eq!(encoded_len(|e| e.put_bytes(Some(&data[..]))), bytes(Some(&data[..])));
        assert_eq!(encoded_len(|e| e.put_bytes(None)), bytes(None));
        assert_eq!(encoded_len(|e| e.put_string("abc")), string("abc"));
        assert_eq!(encoded_len(|e| e.put_nullable_string(None)), nullable_string(None));

        let ii32 = [1, 2, 3];
        assert_eq!(
            encoded_len(|e| e.put_int32_array(Some(&ii32[..]))),
            int32_array(Some(&ii32[..]))
        );
        let ii64 = [1i64, 2];
        assert_eq!(
            encoded_len(|e| e.put_int64_array(Some(&ii64[..]))),
            int64_array(Some(&ii64[..]))
        );
        let ss = ["a", "bc", ""];
        assert_eq!(
            encoded_len(|e| e.put_string_array(Some(&ss[..]))),
            string_array(Some(&ss[..]))
        );
    }

    #[test]
    fn test_sizes_saturate_instead_of_wrapping() {
        assert_eq!(len_i32(usize::MAX), i32::MAX);
        assert_eq!(len_i32(i32::MAX as usize + 1), i32::MAX);
        assert_eq!(len_i32(5), 5);

        // 2100 string x 1 MiB > i32::MAX, tanpa benar-benar alokasi 2 GiB
        let chunk = "x".repeat(1 << 20);
        let items = vec![chunk.as_str(); 2100];
        assert_eq!(string_array(Some(&items[..])), i32::MAX);
        assert_eq!(string_array(Some(&items[..1])), ARRAY_LENGTH + INT16 + (1 << 20));
    }

    #[test]
    fn test_varint_sizes() {
        assert_eq!(varint(0), 1);
        assert_eq!(varint(-1), 1);
        assert_eq!(varint(63), 1);
        assert_eq!(varint(64), 2);
        assert_eq!(varint(i64::MAX), 10);
        assert_eq!(varint(i64::MIN), 10);
        for i in [0, 1, -1, 300, -300, i64::MIN, i64::MAX] {
            assert_eq!(encoded_len(|e| e.put_varint(i)), varint(i));
        }
        assert_eq!(var_string(Some("abc")), 4);
        assert_eq!(var_bytes(None), 1);
        assert_eq!(
            encoded_len(|e| e.put_var_string(Some("abc"))),
            var_string(Some("abc"))
        );
    }
}
