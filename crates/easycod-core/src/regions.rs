//! Static table of the 58 Algerian wilayas used as the unit of delivery pricing.

/// An administrative region (wilaya). Immutable reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub id: u8,
    /// Two-digit official code, e.g. `"09"`.
    pub code: &'static str,
    pub name_ar: &'static str,
    pub name_fr: &'static str,
}

impl Region {
    const fn new(id: u8, code: &'static str, name_ar: &'static str, name_fr: &'static str) -> Self {
        Self {
            id,
            code,
            name_ar,
            name_fr,
        }
    }
}

/// All wilayas, ordered by id. `REGIONS[n - 1].id == n`.
pub static REGIONS: [Region; 58] = [
    Region::new(1, "01", "أدرار", "Adrar"),
    Region::new(2, "02", "الشلف", "Chlef"),
    Region::new(3, "03", "الأغواط", "Laghouat"),
    Region::new(4, "04", "أم البواقي", "Oum El Bouaghi"),
    Region::new(5, "05", "باتنة", "Batna"),
    Region::new(6, "06", "بجاية", "Bejaia"),
    Region::new(7, "07", "بسكرة", "Biskra"),
    Region::new(8, "08", "بشار", "Bechar"),
    Region::new(9, "09", "البليدة", "Blida"),
    Region::new(10, "10", "البويرة", "Bouira"),
    Region::new(11, "11", "تمنراست", "Tamanrasset"),
    Region::new(12, "12", "تبسة", "Tebessa"),
    Region::new(13, "13", "تلمسان", "Tlemcen"),
    Region::new(14, "14", "تيارت", "Tiaret"),
    Region::new(15, "15", "تيزي وزو", "Tizi Ouzou"),
    Region::new(16, "16", "الجزائر", "Alger"),
    Region::new(17, "17", "الجلفة", "Djelfa"),
    Region::new(18, "18", "جيجل", "Jijel"),
    Region::new(19, "19", "سطيف", "Setif"),
    Region::new(20, "20", "سعيدة", "Saida"),
    Region::new(21, "21", "سكيكدة", "Skikda"),
    Region::new(22, "22", "سيدي بلعباس", "Sidi Bel Abbes"),
    Region::new(23, "23", "عنابة", "Annaba"),
    Region::new(24, "24", "قالمة", "Guelma"),
    Region::new(25, "25", "قسنطينة", "Constantine"),
    Region::new(26, "26", "المدية", "Medea"),
    Region::new(27, "27", "مستغانم", "Mostaganem"),
    Region::new(28, "28", "المسيلة", "M'Sila"),
    Region::new(29, "29", "معسكر", "Mascara"),
    Region::new(30, "30", "ورقلة", "Ouargla"),
    Region::new(31, "31", "وهران", "Oran"),
    Region::new(32, "32", "البيض", "El Bayadh"),
    Region::new(33, "33", "إليزي", "Illizi"),
    Region::new(34, "34", "برج بوعريريج", "Bordj Bou Arreridj"),
    Region::new(35, "35", "بومرداس", "Boumerdes"),
    Region::new(36, "36", "الطارف", "El Tarf"),
    Region::new(37, "37", "تندوف", "Tindouf"),
    Region::new(38, "38", "تيسمسيلت", "Tissemsilt"),
    Region::new(39, "39", "الوادي", "El Oued"),
    Region::new(40, "40", "خنشلة", "Khenchela"),
    Region::new(41, "41", "سوق أهراس", "Souk Ahras"),
    Region::new(42, "42", "تيبازة", "Tipaza"),
    Region::new(43, "43", "ميلة", "Mila"),
    Region::new(44, "44", "عين الدفلى", "Ain Defla"),
    Region::new(45, "45", "النعامة", "Naama"),
    Region::new(46, "46", "عين تموشنت", "Ain Temouchent"),
    Region::new(47, "47", "غرداية", "Ghardaia"),
    Region::new(48, "48", "غليزان", "Relizane"),
    Region::new(49, "49", "تيميمون", "Timimoun"),
    Region::new(50, "50", "برج باجي مختار", "Bordj Badji Mokhtar"),
    Region::new(51, "51", "أولاد جلال", "Ouled Djellal"),
    Region::new(52, "52", "بني عباس", "Beni Abbes"),
    Region::new(53, "53", "عين صالح", "In Salah"),
    Region::new(54, "54", "عين قزام", "In Guezzam"),
    Region::new(55, "55", "تقرت", "Touggourt"),
    Region::new(56, "56", "جانت", "Djanet"),
    Region::new(57, "57", "المغير", "El M'Ghair"),
    Region::new(58, "58", "المنيعة", "El Meniaa"),
];

/// Looks up a region by numeric id.
#[must_use]
pub fn find_region(id: u16) -> Option<&'static Region> {
    REGIONS
        .get(usize::from(id).checked_sub(1)?)
        .filter(|r| u16::from(r.id) == id)
}

/// Commune that prices each region for per-commune providers: the chef-lieu,
/// as `(region id, commune id)`. Kept apart from [`REGIONS`] so a provider
/// whose commune numbering drifts can be corrected entry by entry.
pub static CHEF_LIEU_COMMUNES: [(u8, u32); 58] = [
    (1, 101),
    (2, 201),
    (3, 301),
    (4, 401),
    (5, 501),
    (6, 601),
    (7, 701),
    (8, 801),
    (9, 901),
    (10, 1001),
    (11, 1101),
    (12, 1201),
    (13, 1301),
    (14, 1401),
    (15, 1501),
    (16, 1601),
    (17, 1701),
    (18, 1801),
    (19, 1901),
    (20, 2001),
    (21, 2101),
    (22, 2201),
    (23, 2301),
    (24, 2401),
    (25, 2501),
    (26, 2601),
    (27, 2701),
    (28, 2801),
    (29, 2901),
    (30, 3001),
    (31, 3101),
    (32, 3201),
    (33, 3301),
    (34, 3401),
    (35, 3501),
    (36, 3601),
    (37, 3701),
    (38, 3801),
    (39, 3901),
    (40, 4001),
    (41, 4101),
    (42, 4201),
    (43, 4301),
    (44, 4401),
    (45, 4501),
    (46, 4601),
    (47, 4701),
    (48, 4801),
    (49, 4901),
    (50, 5001),
    (51, 5101),
    (52, 5201),
    (53, 5301),
    (54, 5401),
    (55, 5501),
    (56, 5601),
    (57, 5701),
    (58, 5801),
];

/// The chef-lieu commune id for `region_id`, if the region is known.
#[must_use]
pub fn chef_lieu_commune(region_id: u16) -> Option<u32> {
    CHEF_LIEU_COMMUNES
        .iter()
        .find(|(id, _)| u16::from(*id) == region_id)
        .map(|(_, commune)| *commune)
}

/// Returns `(local, ascii)` display names for `id`, synthesizing
/// `Wilaya {id}` when the id is not in the table.
#[must_use]
pub fn region_names(id: u16) -> (String, String) {
    match find_region(id) {
        Some(region) => (region.name_ar.to_string(), region.name_fr.to_string()),
        None => {
            let placeholder = format!("Wilaya {id}");
            (placeholder.clone(), placeholder)
        }
    }
}
