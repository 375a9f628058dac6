//! Case-type display names and the portal codes they submit as.
//!
//! The portal's search form shows human-readable case types (`"W.P.(C)"`)
//! but posts a short code (`"CW"`). Several display names share a code.

use serde::Serialize;

/// A case type as shown to users, paired with the code the portal expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaseType {
    /// Display name (e.g. `"CRL.M.C."`).
    pub name: &'static str,
    /// Portal form code (e.g. `"CRLMM"`).
    pub code: &'static str,
}

impl CaseType {
    const fn new(name: &'static str, code: &'static str) -> Self {
        Self { name, code }
    }
}

/// Every case type in the portal's dropdown order.
static CASE_TYPES: &[CaseType] = &[
    CaseType::new("ARB.A.", "AAP"),
    CaseType::new("ARB. A. (COMM.)", "ARBACOMM"),
    CaseType::new("ARB.P.", "AA"),
    CaseType::new("BAIL APPLN.", "BA"),
    CaseType::new("CA", "CAA"),
    CaseType::new("CA (COMM.IPD-CR)", "CACR"),
    CaseType::new("C.A.(COMM.IPD-GI)", "CAG"),
    CaseType::new("C.A.(COMM.IPD-PAT)", "CAP"),
    CaseType::new("C.A.(COMM.IPD-PV)", "CAPP"),
    CaseType::new("C.A.(COMM.IPD-TM)", "CAT"),
    CaseType::new("CAVEAT(CO.)", "CAVC"),
    CaseType::new("CC(ARB.)", "CC"),
    CaseType::new("CCP(CO.)", "CCPCO"),
    CaseType::new("CCP(REF)", "CCPRF"),
    CaseType::new("CEAC", "CEAC"),
    CaseType::new("CEAR", "CEAR"),
    CaseType::new("CHAT.A.C.", "CHATAC"),
    CaseType::new("CHAT.A.REF", "CHATRF"),
    CaseType::new("CMI", "CMI"),
    CaseType::new("CM(M)", "CMM"),
    CaseType::new("CM(M)-IPD", "CMMI"),
    CaseType::new("C.O.", "CO"),
    CaseType::new("CO.APP.", "COA"),
    CaseType::new("CO.APPL.(C)", "CAC"),
    CaseType::new("CO.APPL.(M)", "CAM"),
    CaseType::new("CO.A(SB)", "COASB"),
    CaseType::new("C.O.(COMM.IPD-CR)", "COC"),
    CaseType::new("C.O.(COMM.IPD-GI)", "COG"),
    CaseType::new("C.O.(COMM.IPD-PAT)", "COP"),
    CaseType::new("C.O. (COMM.IPD-TM)", "COT"),
    CaseType::new("CO.EX.", "COEX"),
    CaseType::new("CONT.APP.(C)", "CCA"),
    CaseType::new("CONT.CAS(C)", "CCP"),
    CaseType::new("CONT.CAS.(CRL)", "CRLCC"),
    CaseType::new("CO.PET.", "CP"),
    CaseType::new("C.REF.(O)", "CRULE"),
    CaseType::new("CRL.A.", "CRLA"),
    CaseType::new("CRL.L.P.", "CRLMP"),
    CaseType::new("CRL.M.C.", "CRLMM"),
    CaseType::new("CRL.M.(CO.)", "CRLMC"),
    CaseType::new("CRL.M.I.", "CRLMI"),
    CaseType::new("CRL.O.", "CRLO"),
    CaseType::new("CRL.O.(CO.)", "CRLOC"),
    CaseType::new("CRL.REF.", "CRLRF"),
    CaseType::new("CRL.REV.P.", "CRLR"),
    CaseType::new("CRL.REV.P.(MAT.)", "CRLRMAT"),
    CaseType::new("CRL.REV.P.(NDPS)", "CRLRNDPS"),
    CaseType::new("CRL.REV.P.(NI)", "CRLRNI"),
    CaseType::new("C.R.P.", "CR"),
    CaseType::new("CRP-IPD", "CRI"),
    CaseType::new("C.RULE", "CRULE"),
    CaseType::new("CS(COMM)", "SC"),
    CaseType::new("CS(OS)", "S"),
    CaseType::new("CS(OS) GP", "S"),
    CaseType::new("CUSAA", "CUSAA"),
    CaseType::new("CUS.A.C.", "CUSAC"),
    CaseType::new("CUS.A.R.", "CUSAR"),
    CaseType::new("CUSTOM A.", "CUSTOMA"),
    CaseType::new("DEATH SENTENCE REF.", "DSRF"),
    CaseType::new("EDC", "EDC"),
    CaseType::new("EDR", "EDR"),
    CaseType::new("EFA(COMM)", "EFAC"),
    CaseType::new("EFA(OS)", "EFAOS"),
    CaseType::new("EFA(OS)  (COMM)", "EFAOSCOMM"),
    CaseType::new("EFA(OS)(IPD)", "EFI"),
    CaseType::new("EL.PET.", "EP"),
    CaseType::new("ETR", "ETR"),
    CaseType::new("EX.F.A.", "EFA"),
    CaseType::new("EX.P.", "EX"),
    CaseType::new("EX.S.A.", "ESA"),
    CaseType::new("FAO", "FAO"),
    CaseType::new("FAO (COMM)", "FAOC"),
    CaseType::new("FAO-IPD", "FAI"),
    CaseType::new("FAO(OS)", "FAOOS"),
    CaseType::new("FAO(OS) (COMM)", "FAC"),
    CaseType::new("FAO(OS)(IPD)", "FAOI"),
    CaseType::new("GCAC", "GCAC"),
    CaseType::new("GCAR", "GCAR"),
    CaseType::new("GTA", "GTA"),
    CaseType::new("GTC", "GTC"),
    CaseType::new("GTR", "GTR"),
    CaseType::new("I.A.", "IA"),
    CaseType::new("I.P.A.", "IPA"),
    CaseType::new("ITA", "ITA"),
    CaseType::new("ITC", "ITC"),
    CaseType::new("ITR", "ITR"),
    CaseType::new("ITSA", "ITSA"),
    CaseType::new("LA.APP.", "LAA"),
    CaseType::new("LPA", "LPA"),
    CaseType::new("MAC.APP.", "MACA"),
    CaseType::new("MAT.", "MAT"),
    CaseType::new("MAT.APP.", "MATA"),
    CaseType::new("MAT.APP.(F.C.)", "MATFC"),
    CaseType::new("MAT.CASE", "MATC"),
    CaseType::new("MAT.REF.", "MATRF"),
    CaseType::new("MISC. APPEAL(PMLA)", "PMLA"),
    CaseType::new("OA", "OA"),
    CaseType::new("OCJA", "OCJA"),
    CaseType::new("O.M.P.", "OMP"),
    CaseType::new("O.M.P. (COMM)", "OMPCOMM"),
    CaseType::new("OMP (CONT.)", "OMP(CONT.)"),
    CaseType::new("O.M.P. (E)", "OE"),
    CaseType::new("O.M.P. (E) (COMM.)", "OMPECOMM"),
    CaseType::new("O.M.P.(EFA)(COMM.)", "OMPEFACOMM"),
    CaseType::new("OMP (ENF.) (COMM.)", "OMPENFCOMM"),
    CaseType::new("O.M.P.(I)", "OI"),
    CaseType::new("O.M.P.(I) (COMM.)", "OMPICOMM"),
    CaseType::new("O.M.P. (J) (COMM.)", "OMPICOMM"),
    CaseType::new("O.M.P. (MISC.)", "OMPMISC"),
    CaseType::new("O.M.P.(MISC.)(COMM.)", "OMPMISCCOMM"),
    CaseType::new("O.M.P.(T)", "OMPT"),
    CaseType::new("O.M.P. (T) (COMM.)", "OMPTCOMM"),
    CaseType::new("O.REF.", "OREF"),
    CaseType::new("RC.REV.", "RCR"),
    CaseType::new("RC.S.A.", "RCSA"),
    CaseType::new("RERA APPEAL", "RERA"),
    CaseType::new("REVIEW PET.", "REVIEWPET"),
    CaseType::new("RFA", "RFA"),
    CaseType::new("RFA(COMM)", "RFAC"),
    CaseType::new("RFA-IPD", "RFI"),
    CaseType::new("RFA(OS)", "RFAOS"),
    CaseType::new("RFA(OS)(COMM)", "RFC"),
    CaseType::new("RF(OS)(IPD)", "RFO"),
    CaseType::new("RSA", "RSA"),
    CaseType::new("SCA", "SCA"),
    CaseType::new("SDR", "SDR"),
    CaseType::new("SERTA", "SERTA"),
    CaseType::new("ST.APPL.", "STA"),
    CaseType::new("STC", "STC"),
    CaseType::new("ST.REF.", "STR"),
    CaseType::new("SUR.T.REF.", "SRTRF"),
    CaseType::new("TEST.CAS.", "PR"),
    CaseType::new("TR.P.(C)", "TRPC"),
    CaseType::new("TR.P.(C.)", "TPC"),
    CaseType::new("TR.P.(CRL.)", "TRP"),
    CaseType::new("VAT APPEAL", "VATA"),
    CaseType::new("W.P.(C)", "CW"),
    CaseType::new("W.P.(C)-IPD", "WO"),
    CaseType::new("WP(C)(IPD)", "WC"),
    CaseType::new("W.P.(CRL)", "CRLW"),
    CaseType::new("WTA", "WTA"),
    CaseType::new("WTC", "WTC"),
    CaseType::new("WTR", "WTR"),
];

/// Returns all known case types in dropdown order.
#[must_use]
pub fn all() -> &'static [CaseType] {
    CASE_TYPES
}

/// Looks up the portal code for an exact display name.
#[must_use]
pub fn code_for(name: &str) -> Option<&'static str> {
    CASE_TYPES
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.code)
}

/// Resolves user input to a portal code.
///
/// Accepts an exact display name first, then a display name or code
/// compared case-insensitively.
#[must_use]
pub fn resolve(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    code_for(input).or_else(|| {
        CASE_TYPES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(input) || t.code.eq_ignore_ascii_case(input))
            .map(|t| t.code)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_display_name_to_code() {
        assert_eq!(code_for("CRL.M.C."), Some("CRLMM"));
        assert_eq!(code_for("W.P.(C)"), Some("CW"));
    }

    #[test]
    fn resolves_raw_codes_case_insensitively() {
        assert_eq!(resolve("crlmm"), Some("CRLMM"));
        assert_eq!(resolve("w.p.(c)"), Some("CW"));
    }

    #[test]
    fn rejects_unknown_case_type() {
        assert_eq!(resolve("NOT A TYPE"), None);
        assert_eq!(resolve("   "), None);
    }

    #[test]
    fn keeps_dropdown_order() {
        assert_eq!(all().first().map(|t| t.name), Some("ARB.A."));
        assert_eq!(all().len(), 143);
    }
}
