use rust_xlsxwriter::{Workbook, XlsxError};

/// Province name, latitude, longitude, rough poor population (thousands).
const PROVINCES: [(&str, f64, f64, f64); 20] = [
    ("ACEH", 4.70, 96.75, 804.5),
    ("SUMATERA UTARA", 2.12, 99.55, 1228.9),
    ("SUMATERA BARAT", -0.74, 100.80, 335.2),
    ("RIAU", 0.29, 101.71, 485.0),
    ("JAMBI", -1.61, 103.61, 279.4),
    ("SUMATERA SELATAN", -3.32, 104.91, 1045.7),
    ("LAMPUNG", -4.56, 105.41, 941.2),
    ("DKI JAKARTA", -6.21, 106.85, 464.9),
    ("JAWA BARAT", -6.89, 107.64, 3890.0),
    ("JAWA TENGAH", -7.15, 110.14, 3700.2),
    ("DI YOGYAKARTA", -7.80, 110.36, 447.3),
    ("JAWA TIMUR", -7.54, 112.24, 3983.0),
    ("BALI", -8.34, 115.09, 176.9),
    ("NUSA TENGGARA BARAT", -8.65, 117.36, 709.1),
    ("NUSA TENGGARA TIMUR", -8.66, 121.08, 1131.6),
    ("KALIMANTAN BARAT", -0.28, 111.48, 335.3),
    ("KALIMANTAN TIMUR", 0.54, 116.42, 221.3),
    ("SULAWESI SELATAN", -3.67, 119.97, 736.5),
    ("MALUKU", -3.24, 130.15, 301.6),
    ("PAPUA", -4.27, 138.08, 915.2),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[lo, hi)`, rounded to two decimals.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 100.0).round() / 100.0
    }
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);
    let mut workbook = Workbook::new();

    // ---- DATA_PROVINSI ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("DATA_PROVINSI")?;
    let headers = [
        "PROVINSI",
        "LATITUDE",
        "LONGITUDE",
        "PENDUDUK_MISKIN",
        "TPT (%)",
        "APS 7-12",
        "APS 13-15",
        "APS 16-18",
        "APS 19-23",
    ];
    for (c, h) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, *h)?;
    }
    for (r, &(name, lat, lon, poor)) in PROVINCES.iter().enumerate() {
        let r = r as u32 + 1;
        sheet.write_string(r, 0, name)?;
        sheet.write_number(r, 1, lat)?;
        sheet.write_number(r, 2, lon)?;
        sheet.write_number(r, 3, poor)?;
        sheet.write_number(r, 4, rng.between(2.0, 8.5))?;
        sheet.write_number(r, 5, rng.between(98.5, 99.9))?;
        sheet.write_number(r, 6, rng.between(93.0, 98.5))?;
        sheet.write_number(r, 7, rng.between(68.0, 84.0))?;
        sheet.write_number(r, 8, rng.between(20.0, 45.0))?;
    }

    // ---- KEMISKINAN_KABKOTA ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("KEMISKINAN_KABKOTA")?;
    for (c, h) in ["PROVINSI", "KABUPATEN/KOTA", "PERSENTASE_MISKIN"].iter().enumerate() {
        sheet.write_string(0, c as u16, *h)?;
    }
    let mut row = 1u32;
    for &(province, ..) in &PROVINCES {
        let count = 6 + (rng.next_u64() % 18) as usize;
        for i in 0..count {
            let kind = if i % 4 == 3 { "KOTA" } else { "KABUPATEN" };
            sheet.write_string(row, 0, province)?;
            sheet.write_string(row, 1, format!("{kind} {province} {}", i + 1))?;
            sheet.write_number(row, 2, rng.between(3.0, 35.0))?;
            row += 1;
        }
    }
    let regencies = row - 1;

    // ---- TPAK_JENISKELAMIN ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("TPAK_JENISKELAMIN")?;
    for (c, h) in ["PROVINSI", "LAKI-LAKI", "PEREMPUAN"].iter().enumerate() {
        sheet.write_string(0, c as u16, *h)?;
    }
    for (r, &(name, ..)) in PROVINCES.iter().enumerate() {
        let r = r as u32 + 1;
        sheet.write_string(r, 0, name)?;
        sheet.write_number(r, 1, rng.between(78.0, 88.0))?;
        sheet.write_number(r, 2, rng.between(45.0, 65.0))?;
    }

    let output_path = "data_python.xlsx";
    workbook.save(output_path)?;

    println!(
        "Wrote {} provinces and {regencies} regencies/cities to {output_path}",
        PROVINCES.len()
    );
    Ok(())
}
