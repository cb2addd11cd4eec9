//! Cache-line size discovery.

/// Process-wide hardware facts the probe depends on.
pub trait Platform {
    /// L1 data cache line size in bytes, or 0 when unknown.
    fn cacheline_size(&self) -> usize;
}

/// Queries the running machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn cacheline_size(&self) -> usize {
        query_cacheline_size()
    }
}

/// Reports a fixed cache-line size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPlatform(
    /// Cache-line size in bytes.
    pub usize,
);

impl Platform for StaticPlatform {
    fn cacheline_size(&self) -> usize {
        self.0
    }
}

#[cfg(target_os = "linux")]
fn query_cacheline_size() -> usize {
    #[cfg(target_env = "gnu")]
    {
        for name in [
            libc::_SC_LEVEL1_DCACHE_LINESIZE,
            libc::_SC_LEVEL2_CACHE_LINESIZE,
            libc::_SC_LEVEL3_CACHE_LINESIZE,
        ] {
            // SAFETY: sysconf has no preconditions.
            let size = unsafe { libc::sysconf(name) };
            if size > 0 {
                return size as usize;
            }
        }
    }

    std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cache/index0/coherency_line_size")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(target_os = "macos")]
fn query_cacheline_size() -> usize {
    let mut size: libc::size_t = 0;
    let mut len = std::mem::size_of::<libc::size_t>();
    // SAFETY: the name is NUL-terminated and `size`/`len` describe a valid output buffer.
    let rc = unsafe {
        libc::sysctlbyname(
            c"hw.cachelinesize".as_ptr(),
            (&mut size as *mut libc::size_t).cast(),
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc == 0 {
        size
    } else {
        0
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn query_cacheline_size() -> usize {
    0
}
