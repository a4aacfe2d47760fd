use std::collections::HashSet;

const FALLBACK_BASE_NAME: &str = "image";
const BMP_EXTENSION: &str = "bmp";

/// Name of the bitmap produced for an uploaded file.
///
/// The base is everything before the first `.`; when that is empty, including
/// names with no `.` at all, the base becomes `image`.
pub fn output_file_name(original_name: &str) -> String {
    format!("{}.{BMP_EXTENSION}", base_name(original_name))
}

/// Output names for a batch of uploads, in input order.
///
/// The first upload with a given base keeps the plain name; later ones get
/// ` (1)`, ` (2)`, ... appended to the base, skipping any name already handed
/// out, so no two entries share an output file.
pub fn unique_output_names<'a, I>(original_names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken = HashSet::new();
    original_names
        .into_iter()
        .map(|original_name| {
            let plain = output_file_name(original_name);
            if taken.insert(plain.clone()) {
                return plain;
            }
            let base = base_name(original_name);
            let mut copy = 1u32;
            loop {
                let candidate = format!("{base} ({copy}).{BMP_EXTENSION}");
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
                copy += 1;
            }
        })
        .collect()
}

fn base_name(original_name: &str) -> &str {
    let base = original_name
        .find('.')
        .map(|dot| &original_name[..dot])
        .unwrap_or("");
    if base.is_empty() { FALLBACK_BASE_NAME } else { base }
}
