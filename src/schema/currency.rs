// src/schema/currency.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// ISO 4217 code → printable symbol. Codes the feed uses but this table
/// lacks simply get no symbol.
static CURRENCY_SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("AED", "د.إ"),
        ("AFN", "؋"),
        ("ALL", "L"),
        ("AMD", "դր."),
        ("ANG", "ƒ"),
        ("AOA", "Kz"),
        ("ARS", "$"),
        ("AUD", "$"),
        ("AWG", "ƒ"),
        ("AZN", "m"),
        ("BAM", "KM"),
        ("BBD", "$"),
        ("BDT", "৳"),
        ("BGN", "лв"),
        ("BHD", "ب.د"),
        ("BIF", "Fr"),
        ("BMD", "$"),
        ("BND", "$"),
        ("BOB", "Bs."),
        ("BRL", "R$"),
        ("BSD", "$"),
        ("BTN", "Nu"),
        ("BWP", "P"),
        ("BYR", "Br"),
        ("BZD", "$"),
        ("CAD", "$"),
        ("CDF", "Fr"),
        ("CHF", "Fr"),
        ("CLP", "$"),
        ("CNY", "¥"),
        ("COP", "$"),
        ("CRC", "₡"),
        ("CUP", "$"),
        ("CVE", "$, Esc"),
        ("CZK", "Kč"),
        ("DJF", "Fr"),
        ("DKK", "kr"),
        ("DOP", "$"),
        ("DZD", "د.ج"),
        ("EEK", "KR"),
        ("EGP", "£,ج.م"),
        ("ERN", "Nfk"),
        ("ETB", "Br"),
        ("EUR", "€"),
        ("FJD", "$"),
        ("FKP", "£"),
        ("GBP", "£"),
        ("GEL", "ლ"),
        ("GHS", "₵"),
        ("GIP", "£"),
        ("GMD", "D"),
        ("GNF", "Fr"),
        ("GTQ", "Q"),
        ("GYD", "$"),
        ("HKD", "$"),
        ("HNL", "L"),
        ("HRK", "kn"),
        ("HTG", "G"),
        ("HUF", "Ft"),
        ("IDR", "Rp"),
        ("ILS", "₪"),
        ("INR", "₨"),
        ("IQD", "ع.د"),
        ("IRR", "﷼"),
        ("ISK", "kr"),
        ("JMD", "$"),
        ("JOD", "د.ا"),
        ("JPY", "¥"),
        ("KES", "Sh"),
        ("KGS", "лв"),
        ("KHR", "៛"),
        ("KMF", "Fr"),
        ("KPW", "₩"),
        ("KRW", "₩"),
        ("KWD", "د.ك"),
        ("KYD", "$"),
        ("KZT", "Т"),
        ("LAK", "₭"),
        ("LBP", "ل.ل"),
        ("LKR", "ரூ"),
        ("LRD", "$"),
        ("LSL", "L"),
        ("LTL", "Lt"),
        ("LVL", "Ls"),
        ("LYD", "ل.د"),
        ("MAD", "د.م."),
        ("MDL", "L"),
        ("MGA", "Ar"),
        ("MKD", "ден"),
        ("MMK", "K"),
        ("MNT", "₮"),
        ("MOP", "P"),
        ("MRO", "UM"),
        ("MUR", "₨"),
        ("MVR", "ރ."),
        ("MWK", "MK"),
        ("MXN", "$"),
        ("MYR", "RM"),
        ("MZN", "MT"),
        ("NAD", "$"),
        ("NGN", "₦"),
        ("NIO", "C$"),
        ("NOK", "kr"),
        ("NPR", "₨"),
        ("NZD", "$"),
        ("OMR", "ر.ع."),
        ("PAB", "B/."),
        ("PEN", "S/."),
        ("PGK", "K"),
        ("PHP", "₱"),
        ("PKR", "₨"),
        ("PLN", "zł"),
        ("PYG", "₲"),
        ("QAR", "ر.ق"),
        ("RON", "RON"),
        ("RSD", "RSD"),
        ("RUB", "р."),
        ("RWF", "Fr"),
        ("SAR", "ر.س"),
        ("SBD", "$"),
        ("SCR", "₨"),
        ("SDG", "S$"),
        ("SEK", "kr"),
        ("SGD", "$"),
        ("SHP", "£"),
        ("SLL", "Le"),
        ("SOS", "Sh"),
        ("SRD", "$"),
        ("STD", "Db"),
        ("SYP", "£, ل.س"),
        ("SZL", "L"),
        ("THB", "฿"),
        ("TJS", "ЅМ"),
        ("TMT", "m"),
        ("TND", "د.ت"),
        ("TOP", "T$"),
        ("TRY", "₤"),
        ("TTD", "$"),
        ("TWD", "$"),
        ("TZS", "Sh"),
        ("UAH", "₴"),
        ("UGX", "Sh"),
        ("USD", "$"),
        ("UYU", "$"),
        ("UZS", "лв"),
        ("VEF", "Bs"),
        ("VND", "₫"),
        ("VUV", "Vt"),
        ("WST", "T"),
        ("XAF", "Fr"),
        ("XCD", "$"),
        ("XOF", "Fr"),
        ("XPF", "Fr"),
        ("YER", "﷼"),
        ("ZAR", "R"),
        ("ZMK", "ZK"),
        ("ZWL", "$"),
    ]
    .into_iter()
    .collect()
});

pub fn currency_symbol(code: &str) -> Option<&'static str> {
    CURRENCY_SYMBOLS.get(code).copied()
}
