//! Blocking Single-Producer Single-Consumer (SPSC) Byte Ring Buffer
//!
//! Cursor `start` (baca) dan `next` (tulis) adalah atomic, masing-masing di
//! cache line sendiri. Data tidak pernah lewat lock: mutex + condvar hanya
//! dipakai sebagai sinyal bangun ketika satu sisi harus menunggu sisi lain.
//!
//! Cursor berjalan di `0..2*capacity`. Bit ekstra ini membedakan buffer
//! penuh (`next - start == capacity`) dari buffer kosong (`next == start`).
//!
//! ```text
//!            start              next
//!              v                  v
//! [ . . . . . D D D D D D D D D . . . . ]
//!             └── readable ─────┘└ free ┘
//! ```
//!
//! [`RingBuffer::with_capacity`] mengembalikan sepasang handle. Masing-masing
//! tidak bisa di-clone dan operasinya butuh `&mut self`, jadi disiplin satu
//! penulis satu pembaca dijamin oleh compiler. Drop salah satu handle akan
//! menutup buffer sehingga sisi lain tidak pernah tergantung selamanya.

use std::cell::UnsafeCell;
use std::io;
use std::ptr;
use std::sync::atomic::{fence, AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Padding untuk cache line isolation (64 bytes pada x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// Hasil `write_n` / `read_n`.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Semua byte yang diminta sudah dipindahkan.
    Complete,
    /// Buffer ditutup sebelum selesai. Bukan error: shutdown adalah lifecycle normal.
    Closed { transferred: usize },
}

impl Transfer {
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        matches!(self, Transfer::Complete)
    }
}

/// Sinyal bangun untuk sisi yang sedang menunggu.
///
/// Sisi yang menunggu mendaftar di `parked` lalu cek ulang kondisinya di
/// bawah lock. Sisi lawan publish cursor dulu, baru cek `parked`. Dua fence
/// SeqCst menjamin minimal satu pihak melihat tulisan pihak lain, jadi
/// wake-up tidak pernah hilang.
struct Parker {
    lock: Mutex<()>,
    cond: Condvar,
    parked: AtomicUsize,
}

impl Parker {
    fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            cond: Condvar::new(),
            parked: AtomicUsize::new(0),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // Lock tidak melindungi data apa pun, poisoning aman diabaikan
        self.lock.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Tidur selama `blocked()` masih `true`.
    fn park_while(&self, blocked: impl Fn() -> bool) {
        let mut guard = self.guard();
        self.parked.fetch_add(1, Ordering::SeqCst);
        fence(Ordering::SeqCst);
        while blocked() {
            guard = self.cond.wait(guard).unwrap_or_else(|p| p.into_inner());
        }
        self.parked.fetch_sub(1, Ordering::SeqCst);
    }

    /// Bangunkan sisi lawan jika sedang parkir. Dipanggil setelah publish cursor.
    #[inline(always)]
    fn unpark(&self) {
        fence(Ordering::SeqCst);
        if self.parked.load(Ordering::SeqCst) > 0 {
            let _guard = self.guard();
            self.cond.notify_all();
        }
    }

    fn unpark_all(&self) {
        let _guard = self.guard();
        self.cond.notify_all();
    }
}

/// State bersama kedua handle.
pub struct RingBuffer {
    // Consumer side - cache line aligned
    start: CacheLinePadded<AtomicUsize>,
    // Producer side - cache line aligned
    next: CacheLinePadded<AtomicUsize>,
    closed: AtomicBool,
    // Pre-allocated, ukuran tetap seumur hidup buffer
    data: Box<[UnsafeCell<u8>]>,
    capacity: usize,
    parker: Parker,
}

// SAFETY: RingBuffer aman untuk Sync karena:
// - Hanya RingWriter yang menulis ke region free dan memajukan `next`
// - Hanya RingReader yang membaca region readable dan memajukan `start`
// - Release/Acquire pada cursor menjamin isi region terlihat sebelum cursor
unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    /// Membuat ring buffer dengan kapasitas `capacity` byte.
    ///
    /// Alokasi hanya terjadi sekali di sini.
    ///
    /// # Panics
    /// Panic jika `capacity == 0` atau terlalu besar untuk aritmetika cursor.
    pub fn with_capacity(capacity: usize) -> (RingWriter, RingReader) {
        assert!(capacity > 0, "capacity must be non-zero");
        assert!(capacity <= usize::MAX / 4, "capacity too large");

        let data: Box<[UnsafeCell<u8>]> = (0..capacity).map(|_| UnsafeCell::new(0)).collect();
        let shared = Arc::new(Self {
            start: CacheLinePadded::new(AtomicUsize::new(0)),
            next: CacheLinePadded::new(AtomicUsize::new(0)),
            closed: AtomicBool::new(false),
            data,
            capacity,
            parker: Parker::new(),
        });

        (
            RingWriter {
                shared: Arc::clone(&shared),
            },
            RingReader { shared },
        )
    }

    #[inline(always)]
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            log::trace!("ring buffer closed (capacity={})", self.capacity);
        }
        self.parker.unpark_all();
    }

    /// Jumlah byte readable di antara dua cursor.
    #[inline(always)]
    fn distance(&self, start: usize, next: usize) -> usize {
        if next >= start {
            next - start
        } else {
            next + 2 * self.capacity - start
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        let start = self.start.value.load(Ordering::Acquire);
        let next = self.next.value.load(Ordering::Acquire);
        self.distance(start, next)
    }

    #[inline(always)]
    fn advance(&self, pos: usize, n: usize) -> usize {
        let pos = pos + n;
        if pos >= 2 * self.capacity {
            pos - 2 * self.capacity
        } else {
            pos
        }
    }

    #[inline(always)]
    fn index(&self, pos: usize) -> usize {
        if pos >= self.capacity {
            pos - self.capacity
        } else {
            pos
        }
    }

    #[inline(always)]
    fn base(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.data.as_ptr())
    }

    /// Salin `src` ke buffer mulai dari cursor `pos`, wrap jika perlu.
    ///
    /// # Safety
    /// Caller adalah satu-satunya writer dan `src.len()` <= ruang free.
    unsafe fn copy_in(&self, pos: usize, src: &[u8]) {
        let idx = self.index(pos);
        let first = src.len().min(self.capacity - idx);
        ptr::copy_nonoverlapping(src.as_ptr(), self.base().add(idx), first);
        ptr::copy_nonoverlapping(src.as_ptr().add(first), self.base(), src.len() - first);
    }

    /// Salin dari buffer mulai cursor `pos` ke `dst`, wrap jika perlu.
    ///
    /// # Safety
    /// Caller adalah satu-satunya reader dan `dst.len()` <= byte readable.
    unsafe fn copy_out(&self, pos: usize, dst: &mut [u8]) {
        let idx = self.index(pos);
        let first = dst.len().min(self.capacity - idx);
        ptr::copy_nonoverlapping(self.base().add(idx), dst.as_mut_ptr(), first);
        ptr::copy_nonoverlapping(self.base(), dst.as_mut_ptr().add(first), dst.len() - first);
    }
}

/// Handle untuk menutup buffer dari thread ketiga.
#[derive(Clone)]
pub struct CloseHandle {
    shared: Arc<RingBuffer>,
}

impl CloseHandle {
    /// Tutup buffer; semua `write_n`/`read_n` yang sedang menunggu langsung kembali.
    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}

/// Sisi penulis (producer).
pub struct RingWriter {
    shared: Arc<RingBuffer>,
}

impl RingWriter {
    /// Tulis `n` byte pertama dari `data`.
    ///
    /// Blok selama buffer penuh, lanjut begitu reader membebaskan ruang.
    /// Kembali setelah semua byte masuk atau buffer ditutup.
    ///
    /// # Panics
    /// Panic jika `n > data.len()`.
    pub fn write_n(&mut self, data: &[u8], n: usize) -> Transfer {
        assert!(n <= data.len(), "n exceeds data length");
        let mut written = 0;
        while written < n {
            match self.write_some(&data[written..n]) {
                0 => return Transfer::Closed { transferred: written },
                k => written += k,
            }
        }
        Transfer::Complete
    }

    /// Tulis sebanyak mungkin (minimal 1 byte) dari `data`.
    ///
    /// Hanya mengembalikan 0 jika `data` kosong atau buffer ditutup.
    pub fn write_some(&mut self, data: &[u8]) -> usize {
        if data.is_empty() {
            return 0;
        }
        let rb = &*self.shared;
        loop {
            if rb.is_closed() {
                return 0;
            }

            let next = rb.next.value.load(Ordering::Relaxed);
            let start = rb.start.value.load(Ordering::Acquire);
            let free = rb.capacity - rb.distance(start, next);

            if free > 0 {
                let n = free.min(data.len());
                // SAFETY: region [next, next+n) free dan hanya writer ini yang menulis
                unsafe { rb.copy_in(next, &data[..n]) };
                // Release: isi region terlihat sebelum cursor baru
                rb.next.value.store(rb.advance(next, n), Ordering::Release);
                rb.parker.unpark();
                return n;
            }

            log::trace!("ring writer parked: buffer full");
            rb.parker
                .park_while(|| !rb.is_closed() && rb.len() == rb.capacity);
        }
    }

    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    pub fn closer(&self) -> CloseHandle {
        CloseHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Byte yang sedang menunggu dibaca.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RingWriter {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl io::Write for RingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.write_n(buf, buf.len()) {
            Transfer::Complete => Ok(buf.len()),
            Transfer::Closed { transferred: 0 } => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "ring buffer closed",
            )),
            Transfer::Closed { transferred } => Ok(transferred),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sisi pembaca (consumer).
pub struct RingReader {
    shared: Arc<RingBuffer>,
}

impl RingReader {
    /// Isi `data[..n]` dengan `n` byte berikutnya, urut FIFO.
    ///
    /// Blok selama data belum cukup. Setelah ditutup, byte yang sudah ada
    /// di buffer masih dibaca tanpa blocking.
    ///
    /// # Panics
    /// Panic jika `n > data.len()`.
    pub fn read_n(&mut self, data: &mut [u8], n: usize) -> Transfer {
        assert!(n <= data.len(), "n exceeds data length");
        let mut read = 0;
        while read < n {
            match self.read_some(&mut data[read..n]) {
                0 => return Transfer::Closed { transferred: read },
                k => read += k,
            }
        }
        Transfer::Complete
    }

    /// Baca byte yang tersedia (minimal 1) ke `data`.
    ///
    /// Hanya mengembalikan 0 jika `data` kosong, atau buffer ditutup dan kosong.
    pub fn read_some(&mut self, data: &mut [u8]) -> usize {
        if data.is_empty() {
            return 0;
        }
        let rb = &*self.shared;
        loop {
            let start = rb.start.value.load(Ordering::Relaxed);
            let next = rb.next.value.load(Ordering::Acquire);
            let available = rb.distance(start, next);

            if available > 0 {
                let n = available.min(data.len());
                // SAFETY: region [start, start+n) sudah dipublish writer
                unsafe { rb.copy_out(start, &mut data[..n]) };
                rb.start.value.store(rb.advance(start, n), Ordering::Release);
                rb.parker.unpark();
                return n;
            }

            if rb.is_closed() {
                // Tulisan terakhir sebelum close harus tetap terbaca
                if rb.len() == 0 {
                    return 0;
                }
                continue;
            }

            log::trace!("ring reader parked: buffer empty");
            rb.parker.park_while(|| !rb.is_closed() && rb.len() == 0);
        }
    }

    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    pub fn closer(&self) -> CloseHandle {
        CloseHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Byte yang siap dibaca.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RingReader {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl io::Read for RingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_some(buf))
    }
}
