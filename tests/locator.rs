//! Boundary locator and offset validation properties.

use rand::Rng;

use cacheline_probe::{locate, word_size_bytes, Boundary, OffsetSweep, ProbeBuffer, ProbeError};

const LINE_SIZES: [usize; 5] = [16, 32, 64, 128, 256];

/// Buffers of at least two lines always contain an aligned word.
#[test]
fn boundary_found_in_two_line_buffers() {
    let mut rng = rand::rng();

    for line in LINE_SIZES {
        let words_per_line = line / word_size_bytes();
        let backing = vec![0usize; 8 * words_per_line];

        for _ in 0..200 {
            let skip = rng.random_range(0..words_per_line);
            let len = rng.random_range(2 * words_per_line..=backing.len() - skip);
            let slice = &backing[skip..skip + len];

            let index = locate(slice, line).unwrap();
            let address = &slice[index] as *const usize as usize;
            assert_eq!(address % line, 0, "line={} skip={} len={}", line, skip, len);
            assert!(index < words_per_line, "first boundary lies within one line");
        }
    }
}

/// Buffers shorter than a line never report a boundary.
#[test]
fn boundary_not_found_in_short_buffers() {
    let mut rng = rand::rng();

    for line in LINE_SIZES {
        let words_per_line = line / word_size_bytes();
        let backing = vec![0usize; 4 * words_per_line];

        for _ in 0..100 {
            let skip = rng.random_range(0..words_per_line);
            let len = rng.random_range(0..words_per_line);
            let result = locate(&backing[skip..skip + len], line);
            assert_eq!(
                result,
                Err(ProbeError::BoundaryNotFound {
                    cacheline_size: line,
                    buffer_len: len,
                })
            );
        }
    }
}

#[cfg(target_pointer_width = "64")]
#[test]
fn reference_buffer_boundary_in_first_line() {
    let buffer = ProbeBuffer::new(64, 10).unwrap();
    assert_eq!(buffer.len(), 80);
    let boundary = buffer.locate_boundary(64).unwrap();
    assert!(boundary.index < 8);
    assert_eq!(boundary.address % 64, 0);
}

/// Offsets -16..=-2 stay inside the buffer exactly when the boundary is at
/// least two words in.
#[cfg(target_pointer_width = "64")]
#[test]
fn offset_sweep_bounds() {
    let sweep = OffsetSweep::new(-16, 15);
    let buffer_bytes = 80 * 8;

    for index in 2..72 {
        let boundary = Boundary {
            index,
            address: 0x10_0000 + index * 8,
            line_size: 64,
        };
        let targets = sweep.resolve(&boundary, buffer_bytes, 8).unwrap();
        assert_eq!(targets.len(), 15);
        for target in targets {
            assert!(target.byte_index + 8 <= buffer_bytes);
            assert_eq!(
                target.byte_index as isize,
                boundary.byte_index() as isize + target.offset
            );
        }
    }

    for index in 0..2 {
        let boundary = Boundary {
            index,
            address: 0x10_0000 + index * 8,
            line_size: 64,
        };
        assert_eq!(
            sweep.resolve(&boundary, buffer_bytes, 8),
            Err(ProbeError::OffsetOutOfBounds {
                offset: -16,
                boundary_index: index,
                buffer_bytes,
            })
        );
    }
}
