use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rsbd8::{Direction, Ldouble80, Ldouble96, Ldouble128, Mode, Projection, sort, sort_indirect};

#[test]
fn scenario_s1_80bit_float_edge_mix_asc_fwd() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut input = vec![
        Ldouble80 { mantissa: 0, signexponent: 0xFFFF },
        Ldouble80 { mantissa: 0, signexponent: 0x7FFF },
        Ldouble80 { mantissa: 0x8000000000000000, signexponent: 0xFFFF },
        Ldouble80 { mantissa: 0xFFFFFFFFFFFFFFFF, signexponent: 0x7FFE },
        Ldouble80 { mantissa: 0, signexponent: 0x0001 },
        Ldouble80 { mantissa: 0xFFFFFFFFFFFFFFFF, signexponent: 0x0000 },
        Ldouble80 { mantissa: 1, signexponent: 0x0000 },
    ];
    sort(&mut input, Direction::AscFwd, Mode::Auto, 0).unwrap();

    let expected = vec![
        Ldouble80 { mantissa: 0x8000000000000000, signexponent: 0xFFFF },
        Ldouble80 { mantissa: 0, signexponent: 0xFFFF },
        Ldouble80 { mantissa: 1, signexponent: 0x0000 },
        Ldouble80 { mantissa: 0xFFFFFFFFFFFFFFFF, signexponent: 0x0000 },
        Ldouble80 { mantissa: 0, signexponent: 0x0001 },
        Ldouble80 { mantissa: 0xFFFFFFFFFFFFFFFF, signexponent: 0x7FFE },
        Ldouble80 { mantissa: 0, signexponent: 0x7FFF },
    ];
    assert_eq!(input, expected);
}

#[test]
fn scenario_s2_same_input_desc_rev_is_s1_reversed() {
    let base = vec![
        Ldouble80 { mantissa: 0, signexponent: 0xFFFF },
        Ldouble80 { mantissa: 0, signexponent: 0x7FFF },
        Ldouble80 { mantissa: 0x8000000000000000, signexponent: 0xFFFF },
        Ldouble80 { mantissa: 0xFFFFFFFFFFFFFFFF, signexponent: 0x7FFE },
        Ldouble80 { mantissa: 0, signexponent: 0x0001 },
        Ldouble80 { mantissa: 0xFFFFFFFFFFFFFFFF, signexponent: 0x0000 },
        Ldouble80 { mantissa: 1, signexponent: 0x0000 },
    ];

    let mut asc_fwd = base.clone();
    sort(&mut asc_fwd, Direction::AscFwd, Mode::Auto, 0).unwrap();

    let mut desc_rev = base;
    sort(&mut desc_rev, Direction::DescRev, Mode::Auto, 0).unwrap();

    let mut expected = asc_fwd;
    expected.reverse();
    assert_eq!(desc_rev, expected);
}

#[test]
fn scenario_s3_single_byte_enum_codes() {
    let mut asc = vec![0u8, 37, 63, 18, 26, 55, 40];
    sort(&mut asc, Direction::AscFwd, Mode::Auto, 0).unwrap();
    assert_eq!(asc, vec![0, 18, 26, 37, 40, 55, 63]);

    let mut desc = vec![0u8, 37, 63, 18, 26, 55, 40];
    sort(&mut desc, Direction::DescRev, Mode::Auto, 0).unwrap();
    assert_eq!(desc, vec![63, 55, 40, 37, 26, 18, 0]);
}

#[test]
fn scenario_s4_32bit_float_sign_magnitude_mix() {
    let mut input = vec![8u32, 0, 3, 0x8000_0002, 3, 0x8000_0012, 0x8000_0002];
    sort(&mut input, Direction::AscFwd, Mode::ForceFloat, 0).unwrap();
    assert_eq!(
        input,
        vec![0x8000_0012, 0x8000_0002, 0x8000_0002, 0, 3, 3, 8]
    );
}

struct CoRecord {
    co: u64,
}

#[test]
fn scenario_s5_8byte_key_via_projection() {
    let records: Vec<CoRecord> = [8u64, 0, 6, 4, 0, 2, 6]
        .into_iter()
        .map(|co| CoRecord { co })
        .collect();
    let order = sort_indirect(
        &records,
        Projection::Get(|r: &CoRecord| r.co),
        Direction::AscFwd,
        Mode::Auto,
    )
    .unwrap();
    let sorted: Vec<u64> = order.iter().map(|&i| records[i as usize].co).collect();
    assert_eq!(sorted, vec![0, 0, 2, 4, 6, 6, 8]);
}

#[test]
fn property_sort_matches_std_sort_for_random_u32() {
    let mut rng = StdRng::seed_from_u64(0xC0FF_EE42);
    for _ in 0..64 {
        let n = rng.random_range(0..500);
        let mut data: Vec<u32> = (0..n).map(|_| rng.random()).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        sort(&mut data, Direction::AscFwd, Mode::Auto, 0).unwrap();
        assert_eq!(data, expected);
    }
}

#[test]
fn property_sort_matches_std_sort_for_random_signed() {
    let mut rng = StdRng::seed_from_u64(0x5EED_1234);
    for _ in 0..64 {
        let n = rng.random_range(0..500);
        let mut data: Vec<i32> = (0..n).map(|_| rng.random()).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        sort(&mut data, Direction::AscFwd, Mode::Auto, 0).unwrap();
        assert_eq!(data, expected);
    }
}

#[test]
fn property_sort_matches_std_sort_for_random_f64_excluding_nan() {
    let mut rng = StdRng::seed_from_u64(0xF10A_7777);
    for _ in 0..64 {
        let n = rng.random_range(0..300);
        let mut data: Vec<f64> = (0..n)
            .map(|_| loop {
                let v: f64 = rng.random_range(-1e9..1e9);
                if !v.is_nan() {
                    break v;
                }
            })
            .collect();
        let mut expected = data.clone();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        sort(&mut data, Direction::AscFwd, Mode::Auto, 0).unwrap();
        assert_eq!(data, expected);
    }
}

#[test]
fn composite_96_and_128_bit_shapes_sort_by_mantissa_then_sign_exponent() {
    let mut a = vec![
        Ldouble96 { mantissa: 5, signexponent: 0x8000_0000 },
        Ldouble96 { mantissa: 5, signexponent: 0 },
        Ldouble96 { mantissa: 0, signexponent: 0 },
    ];
    sort(&mut a, Direction::AscFwd, Mode::Auto, 0).unwrap();
    assert_eq!(
        a,
        vec![
            Ldouble96 { mantissa: 5, signexponent: 0x8000_0000 },
            Ldouble96 { mantissa: 0, signexponent: 0 },
            Ldouble96 { mantissa: 5, signexponent: 0 },
        ]
    );

    let mut b = vec![
        Ldouble128 { mantissa: 1, signexponent: 0x8000_0000_0000_0000 },
        Ldouble128 { mantissa: 1, signexponent: 1 },
    ];
    sort(&mut b, Direction::AscFwd, Mode::Auto, 0).unwrap();
    assert_eq!(
        b,
        vec![
            Ldouble128 { mantissa: 1, signexponent: 0x8000_0000_0000_0000 },
            Ldouble128 { mantissa: 1, signexponent: 1 },
        ]
    );
}
