mod test_clip_basic;
