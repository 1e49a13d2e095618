// SPDX-License-Identifier: GPL-3.0-or-later

use criterion::{criterion_group, criterion_main, Criterion};

/// A scenario-only buffer, the cheapest possible walk: header, index
/// header, one tag-table entry, and an all-empty `scnr` payload.
fn trivial_map() -> Vec<u8> {
    const HEADER_SIZE: usize = 0x800;
    const ENTRY_SIZE: usize = 28;

    let index_offset = HEADER_SIZE as u32;
    let main_magic = tagmend::header::META_MEMORY_OFFSET.wrapping_sub(index_offset);
    let table_offset = HEADER_SIZE + 12;
    let payload_base = table_offset + ENTRY_SIZE;
    let payload_len = 14 * 12; // ScenarioDependencies: 14 empty Reflexive fields
    let total_len = payload_base + payload_len;

    let mut buffer = vec![0u8; total_len];
    buffer[0..4].copy_from_slice(&u32::from_le_bytes(*b"deah").to_le_bytes());
    buffer[4..8].copy_from_slice(&1u32.to_le_bytes());
    buffer[8..12].copy_from_slice(&(total_len as u32).to_le_bytes());
    buffer[12..16].copy_from_slice(&index_offset.to_le_bytes());
    buffer[16..20].copy_from_slice(&(total_len as u32 - index_offset).to_le_bytes());
    buffer[HEADER_SIZE - 4..HEADER_SIZE].copy_from_slice(&u32::from_le_bytes(*b"toof").to_le_bytes());

    let tag_index_pointer = main_magic.wrapping_add(table_offset as u32);
    buffer[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(&tag_index_pointer.to_le_bytes());
    // scenario_tag_id = { table_index: 0, salt: 1 }
    buffer[HEADER_SIZE + 4..HEADER_SIZE + 6].copy_from_slice(&0u16.to_le_bytes());
    buffer[HEADER_SIZE + 6..HEADER_SIZE + 8].copy_from_slice(&1u16.to_le_bytes());
    buffer[HEADER_SIZE + 8..HEADER_SIZE + 12].copy_from_slice(&1u32.to_le_bytes());

    let payload_pointer = main_magic.wrapping_add(payload_base as u32);
    buffer[table_offset + 12..table_offset + 16].copy_from_slice(&0u16.to_le_bytes());
    buffer[table_offset + 14..table_offset + 16].copy_from_slice(&1u16.to_le_bytes());
    buffer[table_offset + 20..table_offset + 24].copy_from_slice(&payload_pointer.to_le_bytes());

    buffer
}

fn bench_deprotect_trivial(c: &mut Criterion) {
    let buffer = trivial_map();
    c.bench_function("deprotect scenario-only map", |b| {
        b.iter(|| tagmend::deprotect::deprotect(&buffer));
    });
}

fn bench_deprotect_garbage(c: &mut Criterion) {
    let garbage = vec![0x41u8; 4096];
    c.bench_function("deprotect unparseable buffer", |b| {
        b.iter(|| tagmend::deprotect::deprotect(&garbage));
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    bench_deprotect_trivial(c);
    bench_deprotect_garbage(c);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
