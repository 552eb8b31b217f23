//! Griffin-π constants for BN254 (state width 3, 12 rounds).

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::MontFp;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::field::modulus;

/// Number of rounds.
pub const NUM_ROUNDS: usize = 12;

/// State width.
pub const WIDTH: usize = 3;

/// Forward power map exponent (lane 1), and the root taken on lane 0.
pub const D: u64 = 5;

/// Linear coefficient of the Horst mixing polynomial on lane 2.
pub const HORST_ALPHA: Fr =
    MontFp!("9242045582776035982243706926516204235817048582477991018040169113011339176522");

/// Constant coefficient of the Horst mixing polynomial on lane 2.
pub const HORST_BETA: Fr =
    MontFp!("19602292250548824693018549751754462955740127433771860547414036906211039243804");

/// Additive round constants, one row per round.
///
/// Row 0 is all zero: the first round follows the initial linear layer
/// directly.
pub const ROUND_CONSTANTS: [[Fr; WIDTH]; NUM_ROUNDS] = [
    [MontFp!("0"), MontFp!("0"), MontFp!("0")],
    [
        MontFp!("21575057070032013575607370249422922168572843616054088010296822695840749775561"),
        MontFp!("18165227539333969138148077798698277323402211342398628298607843458095584163529"),
        MontFp!("1726126395805628800811790548952231892211784821081817835072372994523321338117"),
    ],
    [
        MontFp!("1545185368456384430532954817331487289151989187672595211469352371091378253885"),
        MontFp!("19171044491551098290395522252304912464559327002560432301678673968926949861926"),
        MontFp!("5784434162687179023209549836142552884059294996247555939093525039376314477915"),
    ],
    [
        MontFp!("19041870414424402495330188617219703023579719543579476561296210734219093014043"),
        MontFp!("20382298809249057036005376676670624720446380175272317642464143230260792704670"),
        MontFp!("13009444832954829058985502029500690726501592107627197241390436937333570997429"),
    ],
    [
        MontFp!("1715719177078607015724280631114759337373736261537569431451955542082533276288"),
        MontFp!("8551065748201611928251861162781465307280998405242469030926330074404586096744"),
        MontFp!("189186554882481350111665188905053862147574246155198382758216311699101217255"),
    ],
    [
        MontFp!("14473938329656650102704190080413881364129591625887496179213615559783397915292"),
        MontFp!("8903124467962093988773613986086570401398179986922534692092313565550524639296"),
        MontFp!("13864034235001923002605948340707601380979809108409165761885129673831018051493"),
    ],
    [
        MontFp!("18345297373373059561518255577690656825065380849379965144740035621401877072372"),
        MontFp!("6960501474279948633450408211052204556971979856679403460192799408668697876762"),
        MontFp!("9468163304179776272950081999298986525386580352510795571499529460201406799439"),
    ],
    [
        MontFp!("7316693399989096710342810924168860974270210526485412478600810846271724246556"),
        MontFp!("6769246517619366931956311152023029679739269828933775723354435018849544041757"),
        MontFp!("4314157147325441971127677600352431302852929177374643535551749560119361627099"),
    ],
    [
        MontFp!("13888909212715802851446585227982106245094197773767741791853418906797723799434"),
        MontFp!("517087463729436326763893682174378235325214458659138005697976070626806932701"),
        MontFp!("16793437231835230049239895698095976948153525201823739063424383701536397690280"),
    ],
    [
        MontFp!("12590851438387885785187904453837464772321677997323903043772903379245474719924"),
        MontFp!("12161103543446852100515796717568924513472366588972876623082363094895121791314"),
        MontFp!("5796018174627845229088205498914615661280859445500332062485954530301265681313"),
    ],
    [
        MontFp!("185679431318234436664825724785777888085115635820188159876654831323012668473"),
        MontFp!("11562651922421652082384873593424554558742416274272852853323139967159985264482"),
        MontFp!("8336868594467734406490560033578188513619444860218799431782386630832313273883"),
    ],
    [
        MontFp!("12231169574412313890341429219149348762535752105916771093104859589828559707789"),
        MontFp!("13598782448295194434910171362195833220188338705311920641119644628875468895749"),
        MontFp!("10664341432766012784920284332819108541459655048225303977605704215204171730007"),
    ],
];

/// `D^(-1) mod (p - 1)`, the exponent that extracts a 5th root.
pub fn inv_d() -> &'static BigInt {
    static INV_D: OnceLock<BigInt> = OnceLock::new();
    INV_D.get_or_init(|| {
        let p_minus_1 = BigInt::from(modulus()) - BigInt::one();
        mod_inverse(&BigInt::from(D), &p_minus_1)
            .unwrap_or_else(|| unreachable!("gcd(5, p - 1) = 1 for the BN254 scalar field"))
    })
}

/// Extended Euclid. `None` when `a` has no inverse modulo `m`.
fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    let (mut old_r, mut r) = (m.clone(), a.clone());
    let (mut old_s, mut s) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    if old_s.is_negative() {
        old_s += m;
    }

    Some(old_s)
}

#[cfg(test)]
mod const_tests {
    use super::*;
    use num_traits::Num;

    #[test]
    fn test_inv_d_matches_published_exponent() {
        let published = BigInt::from_str_radix(
            "26b6a528b427b35493736af8679aad17535cb9d394945a0dcfe7f7a98ccccccd",
            16,
        )
        .unwrap();
        assert_eq!(inv_d(), &published);
    }

    #[test]
    fn test_mod_inverse_small() {
        assert_eq!(
            mod_inverse(&BigInt::from(3), &BigInt::from(11)),
            Some(BigInt::from(4))
        );
        assert_eq!(mod_inverse(&BigInt::from(4), &BigInt::from(8)), None);
    }

    #[test]
    fn test_first_round_is_passthrough() {
        assert!(ROUND_CONSTANTS[0].iter().all(|c| c.is_zero()));
        assert!(ROUND_CONSTANTS[1..]
            .iter()
            .all(|row| row.iter().all(|c| !c.is_zero())));
    }
}
