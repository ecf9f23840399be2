//! HIV-1 NL4-3 reference splice sites and the bundled example input.

use crate::ast::SiteType;

/// Last coordinate of the NL4-3 genome; the value of the `end` keyword.
pub const GENOME_END: u32 = 9632;

/// Major 5' splice sites.
pub const DONORS: [(&str, u32); 5] = [
    ("D1", 743),
    ("D2", 4962),
    ("D2b", 5058),
    ("D3", 5463),
    ("D4", 6046),
];

/// Major 3' splice sites.
pub const ACCEPTORS: [(&str, u32); 8] = [
    ("A1", 4913),
    ("A2", 5390),
    ("A3", 5777),
    ("A4c", 5936),
    ("A4a", 5954),
    ("A4b", 5960),
    ("A5", 5976),
    ("A7", 8369),
];

/// NL4-3 position of the named splice site, if it is a reference site.
#[must_use]
pub fn reference_position(site_type: SiteType, name: &str) -> Option<u32> {
    let table: &[(&str, u32)] = match site_type {
        SiteType::Donor => &DONORS,
        SiteType::Acceptor => &ACCEPTORS,
    };
    table
        .iter()
        .find(|(reference, _)| *reference == name)
        .map(|&(_, position)| position)
}

/// Starter file written by `isoforms --example`.
pub const EXAMPLE_CSV: &str = "\
[title]
My plot A

[donors]
name,position,colour
D1,743,
D2,4962,
D2b,5058,
D3,5463,
D4,6046,

[acceptors]
name,position,colour
A1,4913,
A2,5390,
A3,5777,
A4c,5936,
A4a,5954,
A4b,5960,
A5,5976,
A7,8369,blue

[transcripts]
fragments,label,group,comment
1-743;4913-end,vif,My Group 1,
1-743;5777-end,vpu/env,My Group 1,
1-743;5390-5463;5954-end,,My Group 1,
1-743;4913-4962;5390-5463;5954-end,,,
1-743;5390-5463;5954-end,,,
1-743;5777-6046;8369-end,rev,,\"(interesting, eh?!)\"
1-743;5777-6046;8369-end,,,(3 copies)
1-743;5777-6046;8369-end,tat,,
1-743;5777-6046;8369-end,,,
1-743;5390-5463;5954-6046;8369-end,nef,,(two like this)
1-743;5954-6046;8369-end,,My Last Group,
1-743;5390-5463;5954-6046;8369-end,,My Last Group,
";
