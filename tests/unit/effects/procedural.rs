use super::*;

fn small(roughness: u32, seed: u64) -> ProceduralTexture {
    ProceduralTexture {
        width: 32,
        height: 24,
        roughness,
        seed,
        ..ProceduralTexture::default()
    }
}

#[test]
fn same_seed_is_byte_identical() {
    let a = small(1, 7).generate();
    let b = small(1, 7).generate();
    assert_eq!(a.data(), b.data());
}

#[test]
fn different_seeds_differ() {
    assert_ne!(small(3, 1).generate().data(), small(3, 2).generate().data());
}

#[test]
fn output_is_opaque_and_between_the_two_colors() {
    let tex = small(4, 42).generate();
    assert_eq!(tex.size(), (32, 24));
    for px in tex.data().chunks_exact(4) {
        assert_eq!(px[3], 255);
        assert!((40..=120).contains(&px[0]));
        assert!((10..=30).contains(&px[1]));
    }
}

#[test]
fn zero_roughness_is_flat_midpoint() {
    let tex = small(0, 1).generate();
    let first = tex.pixel(0, 0).unwrap();
    assert!(tex.data().chunks_exact(4).all(|px| px == first.to_array()));
    assert_eq!(first.r, 80);
}
