use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vdif::{VdifHeader, layout, make_parser};

const WORDS: [u32; 8] = [
    14363767, 469762048, 536871541, 67239932, 58720272, 2896953069, 859832320, 4060288387,
];

fn gen_frames(count: usize) -> Vec<[u32; 8]> {
    // Deterministic but non-trivial pattern
    (0..count as u32)
        .map(|i| {
            let mut words = WORDS;
            words[0] = WORDS[0].wrapping_add(i) & 0x3FFF_FFFF;
            words[1] = (WORDS[1] & 0xFF00_0000) | (i.wrapping_mul(31) & 0xFF_FFFF);
            words
        })
        .collect()
}

fn bench_parser(c: &mut Criterion) {
    let parser = make_parser(1, 24, 6).unwrap();
    c.bench_function("extract_ref_epoch", |b| {
        b.iter(|| parser.extract(black_box(&WORDS)).unwrap())
    });
}

fn bench_header_decode(c: &mut Criterion) {
    c.bench_function("decode_layout", |b| {
        b.iter(|| layout::vdif().decode(black_box(&WORDS)).unwrap())
    });

    for &count in &[1usize, 64, 1024] {
        let frames = gen_frames(count);

        c.bench_function(&format!("decode_{}_headers", count), |b| {
            b.iter(|| {
                for words in &frames {
                    let header = VdifHeader::from_words(words).unwrap();
                    black_box(header.num_samples());
                }
            })
        });
    }
}

criterion_group!(benches, bench_parser, bench_header_decode);
criterion_main!(benches);
