/// Maps a closed enum to the integer code persisted in the store.
pub trait StoredCode: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn code(self) -> i64;

    fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|variant| variant.code() == code)
    }
}
