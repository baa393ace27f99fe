/// Format a CoreAudio `OSStatus` code into a human-readable string.
///
/// HAL errors are four-character codes; known ones are returned with their
/// symbolic name, other printable codes as `'abcd'`, anything else as decimal
/// and hex.
pub fn os_status(code: i32) -> String {
    let name = match &code.to_be_bytes() {
        b"what" => Some("kAudioHardwareUnspecifiedError"),
        b"stop" => Some("kAudioHardwareNotRunningError"),
        b"who?" => Some("kAudioHardwareUnknownPropertyError"),
        b"!siz" => Some("kAudioHardwareBadPropertySizeError"),
        b"nope" => Some("kAudioHardwareIllegalOperationError"),
        b"!obj" => Some("kAudioHardwareBadObjectError"),
        b"!dev" => Some("kAudioHardwareBadDeviceError"),
        b"!str" => Some("kAudioHardwareBadStreamError"),
        b"unop" => Some("kAudioHardwareUnsupportedOperationError"),
        b"!dat" => Some("kAudioDeviceUnsupportedFormatError"),
        b"!hog" => Some("kAudioDevicePermissionsError"),
        _ => None,
    };
    match (code, name) {
        (0, _) => "kAudioHardwareNoError (0)".to_string(),
        (_, Some(name)) => format!("{name} ('{}')", four_cc(code).unwrap_or_default()),
        (other, None) => match four_cc(other) {
            Some(fcc) => format!("OSStatus '{fcc}' ({other})"),
            None => format!("OSStatus {other} ({other:#X})"),
        },
    }
}

fn four_cc(code: i32) -> Option<String> {
    let bytes = code.to_be_bytes();
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::os_status;

    fn fcc(s: &[u8; 4]) -> i32 {
        i32::from_be_bytes(*s)
    }

    #[test]
    fn known_codes_are_named() {
        assert_eq!(
            os_status(fcc(b"!dev")),
            "kAudioHardwareBadDeviceError ('!dev')"
        );
        assert_eq!(
            os_status(fcc(b"nope")),
            "kAudioHardwareIllegalOperationError ('nope')"
        );
    }

    #[test]
    fn unknown_printable_codes_keep_their_characters() {
        assert_eq!(os_status(fcc(b"abcd")), format!("OSStatus 'abcd' ({})", fcc(b"abcd")));
    }

    #[test]
    fn other_codes_fall_back_to_hex() {
        assert_eq!(os_status(-42), "OSStatus -42 (0xFFFFFFD6)");
        assert_eq!(os_status(0), "kAudioHardwareNoError (0)");
    }
}
