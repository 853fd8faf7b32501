use mineos_asic::Algorithm;

pub const MANUFACTURER: &str = "Baikal";

/// Default SSH login shipped with Baikal firmware
pub const SSH_USER: &str = "baikal";
pub const SSH_PASSWORD: &str = "baikal";
pub const SSH_PORT: u16 = 22;

pub const MINER_START_COMMAND: &str = "sudo systemctl start sgminer";
pub const MINER_STOP_COMMAND: &str = "sudo systemctl stop sgminer";

pub fn reboot_command(delay_minutes: u32) -> String {
    format!("shutdown -r +{}", delay_minutes)
}

/// Miner API commands
pub mod commands {
    pub const SYSTEM: &str = "system";
    pub const STATS: &str = "summary+devs+stats+pools+system";
    pub const RESTART: &str = "restart";
    pub const MINER_CONFIG: &str = "minerconf";
    pub const POOL_CONFIG: &str = "poolconf";
    pub const SET_MINER_CONFIG: &str = "setminerconf";
    pub const SET_POOL_CONFIG: &str = "setpoolconf";
}

/// Reply sections
pub mod sections {
    pub const SUMMARY: &str = "SUMMARY";
    pub const DEVS: &str = "DEVS";
    pub const STATS: &str = "STATS";
    pub const POOLS: &str = "POOLS";
    pub const SYSTEM: &str = "SYSTEM";
    pub const MINER_CONFIG: &str = "MINERCONF";
    pub const POOL_CONFIG: &str = "POOLCONF";
}

/// sgminer kernel name of each algorithm the firmware can mine
pub const ALGORITHM_NAMES: &[(Algorithm, &str)] = &[
    (Algorithm::X11, "x11"),
    (Algorithm::X13, "x13"),
    (Algorithm::X14, "x14"),
    (Algorithm::X15, "x15"),
    (Algorithm::Quark, "quark"),
    (Algorithm::Qubit, "qubit"),
    (Algorithm::MyriadGroestl, "myriadcoin-groestl"),
    (Algorithm::Skein, "skeincoin"),
    (Algorithm::Nist5, "nist5"),
    (Algorithm::Blake256r8, "blakecoin"),
    (Algorithm::Blake256r8vnl, "vanilla"),
    (Algorithm::Blake256r14, "decred"),
    (Algorithm::Blake2b, "sia"),
    (Algorithm::Lbry, "lbry"),
    (Algorithm::Pascal, "pascal"),
    (Algorithm::CryptonightLite, "cryptonight-lite"),
];

const X_FAMILY: &[Algorithm] = &[
    Algorithm::X11,
    Algorithm::X13,
    Algorithm::X14,
    Algorithm::X15,
    Algorithm::Quark,
    Algorithm::Qubit,
];

const BLAKE_FAMILY: &[Algorithm] = &[
    Algorithm::Blake256r8,
    Algorithm::Blake256r8vnl,
    Algorithm::Blake256r14,
    Algorithm::Blake2b,
    Algorithm::Lbry,
    Algorithm::Pascal,
];

const MINI_MINER: &[Algorithm] = &[
    Algorithm::X11,
    Algorithm::Quark,
    Algorithm::Qubit,
    Algorithm::MyriadGroestl,
    Algorithm::Skein,
    Algorithm::Nist5,
];

/// Reported product type → algorithms the hardware can mine
pub const MODEL_ALGORITHMS: &[(&str, &[Algorithm])] = &[
    ("Giant X10", X_FAMILY),
    ("Giant B", BLAKE_FAMILY),
    ("Giant N", &[Algorithm::CryptonightLite]),
    ("Mini Miner", MINI_MINER),
    ("Quadruple Mini Miner", MINI_MINER),
];

/// Algorithms of a product type; unknown models get an empty set
pub fn model_algorithms(product_type: &str) -> &'static [Algorithm] {
    let product_type = product_type.trim();
    MODEL_ALGORITHMS
        .iter()
        .find(|(model, _)| model.eq_ignore_ascii_case(product_type))
        .map(|(_, algos)| *algos)
        .unwrap_or(&[])
}

pub fn vendor_algorithm_name(algo: Algorithm) -> Option<&'static str> {
    ALGORITHM_NAMES
        .iter()
        .find(|(a, _)| *a == algo)
        .map(|(_, name)| *name)
}

pub fn canonical_algorithm(vendor_name: &str) -> Option<Algorithm> {
    ALGORITHM_NAMES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(vendor_name.trim()))
        .map(|(algo, _)| *algo)
}
